//! # Conditions Report Rendering
//!
//! Builds the derived values for one beach at one instant and renders them
//! as terminal text: a summary block, the hourly wave table and an ASCII
//! tide chart. All functions return strings; printing is up to the caller.

use crate::config::Config;
use crate::marine::{
    current_conditions, windowed_view, Conditions, ConditionsSource, DerivedWaveView, DisplayZone,
    MarineFeed, PeakSummary,
};
use crate::tides::{TideState, TideTable};
use crate::{TideExtremum, TideSeries};
use chrono::{DateTime, Utc};
use serde::Serialize;

const Y_AXIS_WIDTH: usize = 5;

/// A tide event with its time already formatted for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TideEvent {
    pub time: String,
    pub height: f64,
}

impl TideEvent {
    fn from_extremum(e: &TideExtremum, zone: &DisplayZone) -> Self {
        TideEvent {
            time: zone.format(e.time),
            height: e.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TideSummary {
    pub height: Option<f64>,
    pub state: Option<TideState>,
    pub next_high: Option<TideEvent>,
    pub next_low: Option<TideEvent>,
}

/// Everything shown for a beach at one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub beach: String,
    pub generated_at: String,
    pub tide: TideSummary,
    pub conditions: Conditions,
    pub window: Vec<DerivedWaveView>,
    pub peak: PeakSummary,
    pub curve: TideSeries,
}

impl Report {
    pub fn build(config: &Config, tides: &TideTable, marine: &MarineFeed, now: DateTime<Utc>) -> Self {
        let zone = config.display_zone();
        let next = tides.next_tides(now);
        let window = windowed_view(&marine.samples(), config.window_options(), now, &zone);
        let peak = PeakSummary::from_view(&window);

        Report {
            beach: config.beach.name.clone(),
            generated_at: zone.format(now),
            tide: TideSummary {
                height: tides.current_height(now),
                state: tides.tide_state(now),
                next_high: next.high.as_ref().map(|e| TideEvent::from_extremum(e, &zone)),
                next_low: next.low.as_ref().map(|e| TideEvent::from_extremum(e, &zone)),
            },
            conditions: current_conditions(marine, &zone),
            window,
            peak,
            curve: tides.sample_curve(now, config.chart_half_window(), config.chart_step()),
        }
    }
}

fn optional_height(height: Option<f64>, places: usize) -> String {
    height.map_or_else(|| "--".to_string(), |h| format!("{h:.places$} m"))
}

fn event_line(event: &Option<TideEvent>) -> String {
    match event {
        Some(e) => format!("{} ({:.2} m)", e.time, e.height),
        None => "--".to_string(),
    }
}

/// Summary block: tide now, next tides, surf now and the window peak.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    let state = match report.tide.state {
        Some(TideState::Rising) => " rising",
        Some(TideState::Falling) => " falling",
        Some(TideState::Slack) => " slack",
        None => "",
    };

    out.push_str(&format!("{} @ {}\n", report.beach, report.generated_at));
    out.push_str(&format!("Tide now:   {}{}\n", optional_height(report.tide.height, 2), state));
    out.push_str(&format!("Next high:  {}\n", event_line(&report.tide.next_high)));
    out.push_str(&format!("Next low:   {}\n", event_line(&report.tide.next_low)));

    let c = &report.conditions;
    if c.source == ConditionsSource::Missing {
        out.push_str("Surf now:   no data\n");
    } else {
        out.push_str(&format!(
            "Surf now:   {:.1} m @ {}s, {}\n",
            c.height, c.period, c.rating
        ));
    }

    let peak = &report.peak;
    if peak.measured {
        out.push_str(&format!("Peak:       {:.1} m at {}\n", peak.height, peak.time));
    } else {
        out.push_str(&format!("Peak:       {}\n", peak.time));
    }
    out
}

/// One row per hour: time, height, period, direction, rating.
pub fn render_window_table(view: &[DerivedWaveView]) -> String {
    if view.is_empty() {
        return "No wave forecast available\n".to_string();
    }

    let mut out = String::from("Time   Height  Period  Dir   Rating\n");
    for row in view {
        let dir = row
            .direction
            .map_or_else(|| "--".to_string(), |d| format!("{d}°"));
        out.push_str(&format!(
            "{:<6} {:>4.1} m  {:>4} s  {:<5} {}\n",
            row.time, row.height, row.period, dir, row.rating
        ));
    }
    out
}

/// Format a chart axis label for a tide height in meters
fn format_axis_label(height_m: f64) -> String {
    if height_m.fract() == 0.0 {
        format!("{:.0}", height_m)
    } else {
        format!("{:.1}", height_m)
    }
}

fn hours_label(mins_rel: i32) -> String {
    let hours = mins_rel / 60;
    if hours > 0 {
        format!("+{hours}h")
    } else {
        format!("{hours}h")
    }
}

/// ASCII tide chart, one column per sample, with the "now" sample as `X`.
pub fn render_tide_chart(series: &TideSeries, rows: usize) -> String {
    let Some((min_m, max_m)) = series.bounds() else {
        return "No tide data available\n".to_string();
    };
    let rows = rows.max(2);
    let sample_count = series.samples.len();
    let range = max_m - min_m;

    let height_to_row = |height_m: f64| {
        let normalized = if range > 0.0 {
            (height_m - min_m) / range
        } else {
            0.5
        };
        ((1.0 - normalized) * (rows as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; rows];

    // Y-axis labels every 0.5 m (or 0.25 m on a small range)
    let step = if range > 1.0 { 0.5 } else { 0.25 };
    let mut label_m = (min_m / step).ceil() * step;
    while label_m <= max_m {
        let row = height_to_row(label_m);
        let label = format!("{:<width$}", format_axis_label(label_m), width = Y_AXIS_WIDTH - 1);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
        grid[row][Y_AXIS_WIDTH - 1] = '│';
        label_m += step;
    }

    let now_index = series
        .samples
        .iter()
        .enumerate()
        .min_by_key(|(_, s)| s.mins_rel.abs())
        .map(|(i, _)| i);

    for (column, sample) in series.samples.iter().enumerate() {
        let row = height_to_row(sample.height_m);
        grid[row][column + Y_AXIS_WIDTH] = if Some(column) == now_index { 'X' } else { '•' };
    }

    let mut out = String::new();
    if series.partial {
        out.push_str("⚠ PARTIAL (feed does not cover the whole window)\n\n");
    }
    for row in grid {
        out.extend(row);
        out.push('\n');
    }

    let padding = " ".repeat(Y_AXIS_WIDTH);
    let markers: String = (0..sample_count)
        .map(|i| if i % 6 == 0 { '|' } else { ' ' })
        .collect();
    out.push_str(&format!("{padding}{markers}\n"));

    let first = hours_label(series.samples[0].mins_rel);
    let last = hours_label(series.samples[sample_count - 1].mins_rel);
    let gap = sample_count.saturating_sub(first.chars().count() + last.chars().count()).max(1);
    out.push_str(&format!("{padding}{first}{}{last}\n", " ".repeat(gap)));
    out
}
