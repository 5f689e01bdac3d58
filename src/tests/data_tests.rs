//! # End-to-End Scenarios for Cape Surf
//!
//! Exercises the library the way the binary does: raw JSON feeds in,
//! derived values out. Each test builds its own feeds with fixed
//! timestamps so results never depend on the wall clock.

use crate::or_empty;
use cape_surf_lib::config::Config;
use cape_surf_lib::feed::{load_marine, load_tides, parse_marine, parse_tides, FeedError};
use cape_surf_lib::marine::{
    current_conditions, peak, windowed_view, ConditionsSource, DisplayZone, MarineFeed,
    PeakSummary, WindowOptions,
};
use cape_surf_lib::report::{render_summary, render_tide_chart, Report};
use cape_surf_lib::surf::{rate, SurfRating};
use cape_surf_lib::tides::{current_height, TideTable};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::{fs, io};
use tempfile::NamedTempFile;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, hour, minute, 0).unwrap()
}

/// Marine JSON with `count` hourly entries starting at `start`.
fn marine_json(start: DateTime<Utc>, count: i64, with_current: bool) -> String {
    let times: Vec<String> = (0..count)
        .map(|i| format!("\"{}\"", (start + Duration::hours(i)).format("%Y-%m-%dT%H:%M")))
        .collect();
    let heights: Vec<String> = (0..count).map(|i| format!("{:.2}", 1.0 + (i % 7) as f64 * 0.25)).collect();
    let periods: Vec<String> = (0..count).map(|i| format!("{:.1}", 8.0 + (i % 5) as f64)).collect();
    let current = if with_current {
        r#", "current": { "time": "2026-10-14T09:30", "wave_height": 2.2, "wave_period": 12.0 }"#
    } else {
        ""
    };
    format!(
        r#"{{ "hourly": {{ "time": [{}], "wave_height": [{}], "wave_period": [{}] }}{} }}"#,
        times.join(","),
        heights.join(","),
        periods.join(","),
        current
    )
}

const TIDES_JSON: &str = r#"[
    { "time": "2026-10-14T00:00:00Z", "type": "high", "height": 1.8 },
    { "time": "2026-10-14T06:00:00Z", "type": "low", "height": 0.3 },
    { "time": "2026-10-14T12:15:00Z", "type": "high", "height": 1.7 },
    { "time": "2026-10-14T18:30:00Z", "type": "low", "height": 0.4 }
]"#;

/// Midpoint between a 1.8 m high and a 0.3 m low.
#[test]
fn midpoint_tide_interpolation() {
    let table = parse_tides(TIDES_JSON).unwrap();
    assert_eq!(table.current_height(at(3, 0)), Some(1.05));
    assert_eq!(current_height(table.extrema(), at(3, 0)), Some(1.05));
}

/// Heights never leave the band between the bracketing extrema, and the
/// next-tide lookup never returns the past.
#[test]
fn tide_properties_hold_over_a_day() {
    let table = parse_tides(TIDES_JSON).unwrap();
    let mut now = at(0, 0) - Duration::hours(1);

    while now <= at(20, 0) {
        if let Some(h) = table.current_height(now) {
            assert!((0.3..=1.8).contains(&h), "height {h} at {now}");
        } else {
            assert!(now < at(0, 0) || now > at(18, 30), "unexpected gap at {now}");
        }

        let next = table.next_tides(now);
        for e in [next.high, next.low].into_iter().flatten() {
            assert!(e.time > now, "next tide {} is not after {now}", e.time);
        }
        now += Duration::minutes(13);
    }
}

#[test]
fn surf_rating_examples() {
    assert_eq!(rate(2.0, 12.0), SurfRating::Fair);
    assert_eq!(rate(3.0, 14.0), SurfRating::Excellent);
}

/// 30 future hours with a 24 hour window start at the first hour.
#[test]
fn window_of_future_feed_starts_at_index_zero() {
    let feed = parse_marine(&marine_json(at(6, 0), 30, false)).unwrap();
    let samples = feed.samples();
    assert_eq!(samples.len(), 30);

    let view = windowed_view(&samples, WindowOptions::default(), at(5, 0), &DisplayZone::default());
    assert_eq!(view.len(), 24);
    assert_eq!(view[0].original_timestamp, at(6, 0));
    assert_eq!(view[0].time, "08:00");
}

#[test]
fn peak_of_empty_window_is_placeholder() {
    assert!(peak(&[]).is_none());
    let summary = PeakSummary::from_view(&[]);
    assert_eq!((summary.height, summary.time.as_str()), (0.0, "--:--"));
}

#[test]
fn conditions_without_current_or_hourly_data() {
    let feed = parse_marine(r#"{ "hourly": { "time": [], "wave_height": [], "wave_period": [] } }"#).unwrap();
    let c = current_conditions(&feed, &DisplayZone::default());
    assert_eq!((c.height, c.period, c.rating), (0.0, 0, SurfRating::Poor));
    assert_eq!(c.source, ConditionsSource::Missing);
}

#[test]
fn conditions_prefer_current_snapshot() {
    let feed = parse_marine(&marine_json(at(0, 0), 12, true)).unwrap();
    let c = current_conditions(&feed, &DisplayZone::default());
    assert_eq!(c.source, ConditionsSource::Current);
    assert_eq!(c.height, 2.2);
    assert_eq!(c.rating, SurfRating::Good);
    assert_eq!(c.time.as_deref(), Some("11:30"));
}

/// Files on disk through to the rendered summary.
#[test]
fn report_from_feed_files() {
    let tides_file = NamedTempFile::new().unwrap();
    fs::write(tides_file.path(), TIDES_JSON).unwrap();
    let marine_file = NamedTempFile::new().unwrap();
    fs::write(marine_file.path(), marine_json(at(0, 0), 48, true)).unwrap();

    let tides = load_tides(tides_file.path()).unwrap();
    let marine = load_marine(marine_file.path()).unwrap();

    let mut config = Config::default();
    config.display.chart_half_window_hours = 3;
    let now = at(9, 0);
    let report = Report::build(&config, &tides, &marine, now);

    assert_eq!(report.window.len(), 24);
    assert!(report.window.iter().all(|v| v.original_timestamp >= now));
    assert!(report.peak.measured);
    assert!(report.window.iter().all(|v| report.peak.height >= v.height));
    assert!(!report.curve.partial);
    assert_eq!(report.curve.samples.len(), 37);

    let summary = render_summary(&report);
    assert!(summary.contains("Muizenberg @ 11:00"));
    assert!(summary.contains("rising"));
    assert!(summary.contains("Next high:  14:15 (1.70 m)"));

    let chart = render_tide_chart(&report.curve, 12);
    assert_eq!(chart.matches('X').count(), 1);
}

/// The JSON output keeps placeholders distinguishable from measurements.
#[test]
fn json_report_marks_missing_data() {
    let report = Report::build(
        &Config::default(),
        &parse_tides("[]").unwrap(),
        &parse_marine("{}").unwrap(),
        at(9, 0),
    );
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["tide"]["height"], serde_json::Value::Null);
    assert_eq!(json["conditions"]["source"], "missing");
    assert_eq!(json["conditions"]["rating"], "poor");
    assert_eq!(json["peak"]["measured"], false);
    assert_eq!(json["peak"]["time"], "--:--");
}

/// A failed feed degrades to an empty one and the report still builds.
#[test]
fn failed_feeds_degrade_to_empty() {
    let lost: Result<TideTable, FeedError> =
        Err(FeedError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")));
    assert!(or_empty(lost, "tide").is_empty());

    let marine = or_empty(load_marine("/nonexistent/marine.json"), "marine");
    assert_eq!(marine, MarineFeed::default());

    let tides = or_empty(parse_tides(TIDES_JSON), "tide");
    assert_eq!(tides.len(), 4);

    let report = Report::build(&Config::default(), &tides, &marine, at(3, 0));
    assert_eq!(report.tide.height, Some(1.05));
    assert_eq!(report.conditions.source, ConditionsSource::Missing);
    assert!(!report.peak.measured);
    assert!(render_summary(&report).contains("Surf now:   no data"));
}
