//! # Cape Surf Core Library
//!
//! Derived beach conditions for Cape Town: tide heights interpolated from a
//! feed of high/low extrema, and surf ratings computed from hourly wave
//! height and period.
//!
//! ## Design Philosophy
//!
//! ### Pure Computation
//! Everything that turns a feed into a displayed value is a synchronous,
//! side-effect-free function over immutable inputs. Fetching, configuration
//! and printing live at the edges ([`feed`], [`config`], [`report`]) so the
//! two engines ([`tides`] and [`surf`]/[`marine`]) can be called from any
//! context without coordination.
//!
//! ### Absence Over Failure
//! Display code should never block on missing data. Operations that cannot
//! produce a value return `Option` (or a type carrying a `measured`/`source`
//! marker) instead of an error, so callers can render a placeholder while
//! still telling "no data" apart from a measured zero.
//!
//! ### Data Flow
//! 1. **Ingest**: tide extrema → [`tides::TideTable`], marine arrays → [`WaveSample`] records
//! 2. **Derive**: interpolate, rate, window, find the peak
//! 3. **Present**: hand the derived values to the report or serialize them
//!
//! ## Core Types
//!
//! - [`TideExtremum`]: a single high or low tide event
//! - [`WaveSample`]: one hour of wave conditions
//! - [`Sample`] / [`TideSeries`]: the interpolated tide curve around "now"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod feed;
pub mod marine;
pub mod report;
pub mod surf;
pub mod tides;

/// Whether an extremum is a local maximum or minimum of the tide curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

/// A high or low tide event as published by the oceanographic provider.
///
/// Deserializes from the feed shape used by the beach backend:
///
/// ```
/// use cape_surf_lib::{TideExtremum, TideKind};
///
/// let json = r#"{ "time": "2026-10-14T04:12:00Z", "type": "high", "height": 1.8 }"#;
/// let extremum: TideExtremum = serde_json::from_str(json).unwrap();
///
/// assert_eq!(extremum.kind, TideKind::High);
/// assert_eq!(extremum.height, 1.8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideExtremum {
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TideKind,
    /// Height in meters above chart datum
    pub height: f64,
}

/// One hourly record of wave conditions.
///
/// The marine provider ships these as parallel arrays; they are zipped into
/// records once by [`marine::MarineFeed::samples`] and handled as records
/// everywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveSample {
    pub time: DateTime<Utc>,
    /// Significant wave height in meters
    pub height: f64,
    /// Wave period in seconds
    pub period: f64,
    /// Mean wave direction in degrees, when the provider supplies it
    pub direction: Option<f64>,
}

/// A point on the interpolated tide curve, relative to "now".
///
/// - Negative `mins_rel`: past (e.g., -60 = 1 hour ago)
/// - Zero: current time (drawn as the "now" marker)
/// - Positive: future
///
/// # Example
/// ```
/// use cape_surf_lib::Sample;
///
/// let now_sample = Sample { mins_rel: 0, height_m: 1.05 };
/// let later = Sample { mins_rel: 120, height_m: 0.62 };
/// assert!(later.mins_rel > now_sample.mins_rel);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Minutes relative to the reference time
    pub mins_rel: i32,
    /// Interpolated tide height in meters
    pub height_m: f64,
}

/// Tide curve sampled on a fixed grid around a reference time.
///
/// `partial` is set when some grid instants fell outside the range covered
/// by the extrema feed and were left out, since the interpolator never
/// extrapolates.
///
/// # Example
/// ```
/// use cape_surf_lib::{Sample, TideSeries};
///
/// let series = TideSeries {
///     samples: vec![
///         Sample { mins_rel: -10, height_m: 1.1 },
///         Sample { mins_rel: 0, height_m: 1.05 },
///         Sample { mins_rel: 10, height_m: 1.0 },
///     ],
///     partial: false,
/// };
///
/// assert_eq!(series.samples.len(), 3);
/// assert!(!series.partial);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TideSeries {
    pub samples: Vec<Sample>,
    pub partial: bool,
}

impl TideSeries {
    /// Sample closest to the reference time, if any.
    pub fn now_sample(&self) -> Option<&Sample> {
        self.samples.iter().min_by_key(|s| s.mins_rel.abs())
    }

    /// Lowest and highest heights in the series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        Some(
            self.samples
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), s| {
                    (min.min(s.height_m), max.max(s.height_m))
                }),
        )
    }
}

/// Round to a fixed number of decimal places, the way heights are displayed.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.049, 2), 1.05);
        assert_eq!(round_to(1.26, 1), 1.3);
        assert_eq!(round_to(-0.04, 1), -0.0);
    }

    #[test]
    fn test_series_bounds_and_now() {
        let series = TideSeries {
            samples: vec![
                Sample { mins_rel: -10, height_m: 0.4 },
                Sample { mins_rel: 0, height_m: 0.9 },
                Sample { mins_rel: 10, height_m: 1.7 },
            ],
            partial: false,
        };
        assert_eq!(series.bounds(), Some((0.4, 1.7)));
        assert_eq!(series.now_sample().map(|s| s.height_m), Some(0.9));
        assert_eq!(TideSeries::default().bounds(), None);
    }

    #[test]
    fn test_extremum_rejects_unknown_kind() {
        let json = r#"{ "time": "2026-10-14T04:12:00Z", "type": "slack", "height": 1.0 }"#;
        assert!(serde_json::from_str::<TideExtremum>(json).is_err());
    }
}
