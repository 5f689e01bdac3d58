//! # Tide Interpolation
//!
//! Computes the instantaneous tide height from a feed of high/low extrema
//! and picks out the next upcoming high and low tide.
//!
//! ## Interpolation Algorithm
//! Linear interpolation between the two extrema bracketing the query time:
//! ```text
//! progress = (now - a.time) / (b.time - a.time)
//! height   = a.height + (b.height - a.height) * progress
//! ```
//! The result is rounded to centimeters. Query times before the first or
//! after the last extremum yield no value; the curve is never extrapolated.
//!
//! ## Ordering
//! [`TideTable`] checks once, at construction, that extrema are strictly
//! ascending in time, so every query can rely on it. The free functions
//! [`current_height`] and [`next_tides`] work on plain slices for callers
//! that already guarantee ordering.
//!
//! Alternation of high and low is assumed but not enforced: a feed with two
//! consecutive highs still interpolates, and the table logs a warning.

use crate::{round_to, Sample, TideExtremum, TideKind, TideSeries};
use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::Serialize;
use thiserror::Error;

/// Widest half window [`TideTable::sample_curve`] will sample.
pub const MAX_CURVE_HALF_WINDOW_DAYS: i64 = 7;

/// Errors raised while building a [`TideTable`].
#[derive(Error, Debug, PartialEq)]
pub enum TideError {
    /// Extremum at `index` is not strictly later than the one before it
    #[error("tide extrema out of order at index {index}")]
    Unordered { index: usize },
}

/// Whether the water is coming in or going out at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TideState {
    Rising,
    Falling,
    /// Both bracketing extrema have the same height
    Slack,
}

/// The next high and low tide after a reference time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct NextTides {
    pub high: Option<TideExtremum>,
    pub low: Option<TideExtremum>,
}

/// Tide extrema in strictly ascending time order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TideTable {
    extrema: Vec<TideExtremum>,
}

impl TideTable {
    /// Build a table from extrema that are already in time order.
    ///
    /// # Example
    /// ```
    /// use cape_surf_lib::tides::{TideError, TideTable};
    /// use cape_surf_lib::{TideExtremum, TideKind};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let a = TideExtremum { time: Utc.with_ymd_and_hms(2026, 10, 14, 6, 0, 0).unwrap(), kind: TideKind::Low, height: 0.3 };
    /// let b = TideExtremum { time: Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap(), kind: TideKind::High, height: 1.8 };
    ///
    /// assert_eq!(TideTable::new(vec![a, b]), Err(TideError::Unordered { index: 1 }));
    /// ```
    pub fn new(extrema: Vec<TideExtremum>) -> Result<Self, TideError> {
        if let Some(pos) = extrema.windows(2).position(|w| w[0].time >= w[1].time) {
            return Err(TideError::Unordered { index: pos + 1 });
        }
        let table = TideTable { extrema };
        table.warn_if_not_alternating();
        Ok(table)
    }

    /// Build a table from extrema in any order.
    ///
    /// Sorting is stable; when two entries share a timestamp the first one
    /// in feed order is kept.
    pub fn sorted(mut extrema: Vec<TideExtremum>) -> Self {
        extrema.sort_by_key(|e| e.time);
        extrema.dedup_by_key(|e| e.time);
        let table = TideTable { extrema };
        table.warn_if_not_alternating();
        table
    }

    pub fn extrema(&self) -> &[TideExtremum] {
        &self.extrema
    }

    pub fn len(&self) -> usize {
        self.extrema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extrema.is_empty()
    }

    /// True when consecutive extrema alternate between high and low.
    pub fn alternates(&self) -> bool {
        self.extrema.windows(2).all(|w| w[0].kind != w[1].kind)
    }

    /// Instantaneous tide height at `now`, if `now` is bracketed by the feed.
    pub fn current_height(&self, now: DateTime<Utc>) -> Option<f64> {
        current_height(&self.extrema, now)
    }

    /// First high and first low strictly after `now`.
    pub fn next_tides(&self, now: DateTime<Utc>) -> NextTides {
        next_tides(&self.extrema, now)
    }

    /// Direction of the tide at `now`, from the bracketing pair.
    pub fn tide_state(&self, now: DateTime<Utc>) -> Option<TideState> {
        let (a, b) = bracket(&self.extrema, now)?;
        Some(if b.height > a.height {
            TideState::Rising
        } else if b.height < a.height {
            TideState::Falling
        } else {
            TideState::Slack
        })
    }

    /// Sample the interpolated curve on a fixed grid centered on `now`.
    ///
    /// Grid instants run from `now - half_window` to `now + half_window`
    /// every `step`. Instants the feed does not cover are skipped and the
    /// series is marked partial. A step shorter than one second yields an
    /// empty, partial series. The half window is capped at
    /// [`MAX_CURVE_HALF_WINDOW_DAYS`].
    pub fn sample_curve(
        &self,
        now: DateTime<Utc>,
        half_window: Duration,
        step: Duration,
    ) -> TideSeries {
        if step.num_seconds() <= 0 {
            return TideSeries {
                samples: Vec::new(),
                partial: true,
            };
        }

        let max_half_window = Duration::days(MAX_CURVE_HALF_WINDOW_DAYS);
        let half_window = half_window.min(max_half_window);
        let steps = (half_window.num_seconds() / step.num_seconds()).max(0);
        let mut samples = Vec::with_capacity((2 * steps + 1) as usize);
        let mut partial = false;

        // |step * i| <= half_window, so neither the i32 cast nor the product can overflow
        for i in -steps..=steps {
            let offset = step * i as i32;
            let height = now
                .checked_add_signed(offset)
                .and_then(|t| self.current_height(t));
            match height {
                Some(height_m) => samples.push(Sample {
                    mins_rel: offset.num_minutes() as i32,
                    height_m,
                }),
                None => partial = true,
            }
        }

        TideSeries { samples, partial }
    }

    fn warn_if_not_alternating(&self) {
        if let Some(pos) = self.extrema.windows(2).position(|w| w[0].kind == w[1].kind) {
            warn!(
                "tide feed has consecutive {:?} extrema at index {}; interpolation continues",
                self.extrema[pos].kind,
                pos + 1
            );
        }
    }
}

/// Interpolated tide height at `now`, rounded to 2 decimal places.
///
/// Returns `None` with fewer than two extrema or when `now` lies outside
/// the span they cover. `extrema` must be in ascending time order.
///
/// # Example
/// ```
/// use cape_surf_lib::tides::current_height;
/// use cape_surf_lib::{TideExtremum, TideKind};
/// use chrono::{TimeZone, Utc};
///
/// let extrema = [
///     TideExtremum { time: Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap(), kind: TideKind::High, height: 1.8 },
///     TideExtremum { time: Utc.with_ymd_and_hms(2026, 10, 14, 6, 0, 0).unwrap(), kind: TideKind::Low, height: 0.3 },
/// ];
/// let now = Utc.with_ymd_and_hms(2026, 10, 14, 3, 0, 0).unwrap();
///
/// assert_eq!(current_height(&extrema, now), Some(1.05));
/// ```
pub fn current_height(extrema: &[TideExtremum], now: DateTime<Utc>) -> Option<f64> {
    let (a, b) = bracket(extrema, now)?;
    let span = (b.time - a.time).num_milliseconds() as f64;
    let progress = if span > 0.0 {
        (now - a.time).num_milliseconds() as f64 / span
    } else {
        // Duplicate timestamps; only reachable through the slice API
        0.0
    };
    Some(round_to(a.height + (b.height - a.height) * progress, 2))
}

/// First high and first low tide strictly after `now`, chosen independently.
///
/// Input order is preserved; no sorting is done here.
pub fn next_tides(extrema: &[TideExtremum], now: DateTime<Utc>) -> NextTides {
    let mut next = NextTides::default();

    for e in extrema.iter().filter(|e| e.time > now) {
        match e.kind {
            TideKind::High if next.high.is_none() => next.high = Some(*e),
            TideKind::Low if next.low.is_none() => next.low = Some(*e),
            _ => {}
        }
        if next.high.is_some() && next.low.is_some() {
            break;
        }
    }

    next
}

/// First consecutive pair with `a.time <= now <= b.time`.
fn bracket(extrema: &[TideExtremum], now: DateTime<Utc>) -> Option<(&TideExtremum, &TideExtremum)> {
    extrema
        .windows(2)
        .find(|w| w[0].time <= now && now <= w[1].time)
        .map(|w| (&w[0], &w[1]))
}
