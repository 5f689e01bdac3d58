//! # Marine Conditions
//!
//! Turns the hourly marine-weather feed into display-ready wave records.
//!
//! ## Feed Shape
//! The provider returns parallel arrays plus an optional snapshot:
//! ```json
//! {
//!   "hourly": {
//!     "time": ["2026-10-14T00:00", "2026-10-14T01:00"],
//!     "wave_height": [1.42, 1.51],
//!     "wave_period": [11.3, 11.8],
//!     "wave_direction": [224, 226]
//!   },
//!   "current": { "time": "2026-10-14T00:45", "wave_height": 1.48, "wave_period": 11.6 }
//! }
//! ```
//! [`MarineFeed::samples`] zips the arrays into [`WaveSample`] records once;
//! everything downstream works on records.
//!
//! ## Missing Data
//! Absent arrays produce an empty sample list, an empty window yields the
//! placeholder peak, and a feed with neither snapshot nor hourly data gives
//! zeroed [`Conditions`] rated poor. Each of these carries a marker
//! (`measured`, [`ConditionsSource`]) so a placeholder is never mistaken for
//! a measured calm sea.

use crate::surf::{rate, SurfRating};
use crate::{round_to, WaveSample};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Time shown for the peak of an empty window.
pub const PLACEHOLDER_TIME: &str = "--:--";

/// Default display offset: South African Standard Time, UTC+02:00, no DST.
pub const CAPE_TOWN_OFFSET_MINUTES: i32 = 120;

pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Marine-weather payload as delivered by the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineFeed {
    pub hourly: Option<HourlySeries>,
    pub current: Option<CurrentSnapshot>,
}

/// Hourly parallel arrays. Individual entries may be null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Option<Vec<String>>,
    pub wave_height: Option<Vec<Option<f64>>>,
    pub wave_period: Option<Vec<Option<f64>>>,
    pub wave_direction: Option<Vec<Option<f64>>>,
}

/// The provider's "current" record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub time: Option<String>,
    pub wave_height: Option<f64>,
    pub wave_period: Option<f64>,
    pub wave_direction: Option<f64>,
}

impl MarineFeed {
    /// Zip the hourly arrays into one record per hour.
    ///
    /// Returns an empty list when `time`, `wave_height` or `wave_period` is
    /// missing. Arrays of unequal length are truncated to the shortest.
    /// Hours with an unparseable time or a null height/period are dropped.
    pub fn samples(&self) -> Vec<WaveSample> {
        let Some(hourly) = &self.hourly else {
            return Vec::new();
        };
        let (Some(times), Some(heights), Some(periods)) =
            (&hourly.time, &hourly.wave_height, &hourly.wave_period)
        else {
            debug!("marine feed is missing hourly time, height or period arrays");
            return Vec::new();
        };
        let directions = hourly.wave_direction.as_deref().unwrap_or_default();

        if times.len() != heights.len() || times.len() != periods.len() {
            warn!(
                "marine feed arrays differ in length (time {}, height {}, period {}); truncating",
                times.len(),
                heights.len(),
                periods.len()
            );
        }

        times
            .iter()
            .zip(heights)
            .zip(periods)
            .enumerate()
            .filter_map(|(i, ((time, height), period))| {
                let Some(time) = parse_feed_time(time) else {
                    debug!("dropping hour {i}: unparseable time {time:?}");
                    return None;
                };
                let (Some(height), Some(period)) = (*height, *period) else {
                    debug!("dropping hour {i}: null height or period");
                    return None;
                };
                Some(WaveSample {
                    time,
                    height,
                    period,
                    direction: directions.get(i).copied().flatten(),
                })
            })
            .collect()
    }
}

/// Parse a provider timestamp.
///
/// Accepts RFC 3339, or the offset-less `YYYY-MM-DDTHH:MM[:SS]` form the
/// provider returns for `timezone=GMT`, read as UTC.
pub fn parse_feed_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Fixed timezone and format used for every displayed time.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayZone {
    offset: FixedOffset,
    time_format: String,
}

impl DisplayZone {
    /// Zone with a fixed offset; `None` if `time_format` is not a valid
    /// strftime pattern.
    pub fn new(offset: FixedOffset, time_format: impl Into<String>) -> Option<Self> {
        let time_format = time_format.into();
        if !Self::is_valid_format(&time_format) {
            return None;
        }
        Some(DisplayZone {
            offset,
            time_format,
        })
    }

    /// Zone from a UTC offset in minutes; `None` if the offset is out of
    /// range or the pattern is invalid.
    pub fn from_offset_minutes(minutes: i32, time_format: impl Into<String>) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Self::new(offset, time_format)
    }

    /// True when chrono can render `pattern` without error.
    pub fn is_valid_format(pattern: &str) -> bool {
        !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn format(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.offset)
            .format(&self.time_format)
            .to_string()
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::from_offset_minutes(CAPE_TOWN_OFFSET_MINUTES, DEFAULT_TIME_FORMAT).unwrap_or_else(
            || DisplayZone {
                offset: Utc.fix(),
                time_format: DEFAULT_TIME_FORMAT.to_string(),
            },
        )
    }
}

/// How many hours to show and where to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowOptions {
    pub size: usize,
    /// Start at the first hour at or after "now" instead of the first hour
    pub anchor_to_now: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions {
            size: 24,
            anchor_to_now: true,
        }
    }
}

/// One hour of wave conditions, rounded and labelled for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedWaveView {
    /// Time of day in the display zone
    pub time: String,
    /// Height in meters, one decimal
    pub height: f64,
    /// Period in whole seconds
    pub period: i32,
    /// Direction in whole degrees
    pub direction: Option<i32>,
    pub rating: SurfRating,
    pub original_timestamp: DateTime<Utc>,
}

impl DerivedWaveView {
    /// Rounded view of a sample. The rating uses the unrounded values.
    pub fn from_sample(sample: &WaveSample, zone: &DisplayZone) -> Self {
        DerivedWaveView {
            time: zone.format(sample.time),
            height: round_to(sample.height, 1),
            period: sample.period.round() as i32,
            direction: sample.direction.map(|d| d.round() as i32),
            rating: rate(sample.height, sample.period),
            original_timestamp: sample.time,
        }
    }
}

/// Display window of at most `opts.size` hours.
///
/// With `anchor_to_now` the window starts at the first sample whose time is
/// at or after `now`. A stale feed with every sample in the past starts at
/// the first sample instead of returning nothing.
pub fn windowed_view(
    samples: &[WaveSample],
    opts: WindowOptions,
    now: DateTime<Utc>,
    zone: &DisplayZone,
) -> Vec<DerivedWaveView> {
    let start = if opts.anchor_to_now {
        samples.iter().position(|s| s.time >= now).unwrap_or_else(|| {
            if !samples.is_empty() {
                debug!("all {} marine samples are in the past; showing from the start", samples.len());
            }
            0
        })
    } else {
        0
    };

    samples[start..]
        .iter()
        .take(opts.size)
        .map(|s| DerivedWaveView::from_sample(s, zone))
        .collect()
}

/// Entry with the greatest height; the first one wins on ties.
pub fn peak(view: &[DerivedWaveView]) -> Option<&DerivedWaveView> {
    view.iter().fold(None, |best, entry| match best {
        Some(b) if b.height >= entry.height => Some(b),
        _ => Some(entry),
    })
}

/// Peak height and time as shown to the user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PeakSummary {
    pub height: f64,
    pub time: String,
    /// False for the placeholder shown when the window is empty
    pub measured: bool,
}

impl PeakSummary {
    pub fn placeholder() -> Self {
        PeakSummary {
            height: 0.0,
            time: PLACEHOLDER_TIME.to_string(),
            measured: false,
        }
    }

    pub fn from_view(view: &[DerivedWaveView]) -> Self {
        peak(view).map_or_else(Self::placeholder, |p| PeakSummary {
            height: p.height,
            time: p.time.clone(),
            measured: true,
        })
    }
}

/// Where a [`Conditions`] value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionsSource {
    /// The feed's current snapshot
    Current,
    /// First hourly sample, used when there is no usable snapshot
    Hourly,
    /// No data; values are zeroed
    Missing,
}

/// Surf conditions right now, rounded like [`DerivedWaveView`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Conditions {
    pub height: f64,
    pub period: i32,
    pub direction: Option<i32>,
    pub rating: SurfRating,
    pub time: Option<String>,
    pub source: ConditionsSource,
}

impl Conditions {
    pub fn missing() -> Self {
        Conditions {
            height: 0.0,
            period: 0,
            direction: None,
            rating: SurfRating::Poor,
            time: None,
            source: ConditionsSource::Missing,
        }
    }

    fn from_values(
        height: f64,
        period: f64,
        direction: Option<f64>,
        time: Option<String>,
        source: ConditionsSource,
    ) -> Self {
        Conditions {
            height: round_to(height, 1),
            period: period.round() as i32,
            direction: direction.map(|d| d.round() as i32),
            rating: rate(height, period),
            time,
            source,
        }
    }
}

/// Current conditions: the snapshot if it has height and period, otherwise
/// the first hourly sample, otherwise zeroed and rated poor.
pub fn current_conditions(feed: &MarineFeed, zone: &DisplayZone) -> Conditions {
    if let Some(current) = &feed.current {
        if let (Some(height), Some(period)) = (current.wave_height, current.wave_period) {
            let time = current
                .time
                .as_deref()
                .and_then(parse_feed_time)
                .map(|t| zone.format(t));
            return Conditions::from_values(
                height,
                period,
                current.wave_direction,
                time,
                ConditionsSource::Current,
            );
        }
        debug!("current snapshot lacks height or period; using hourly data");
    }

    match feed.samples().first() {
        Some(first) => Conditions::from_values(
            first.height,
            first.period,
            first.direction,
            Some(zone.format(first.time)),
            ConditionsSource::Hourly,
        ),
        None => Conditions::missing(),
    }
}
