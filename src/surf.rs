//! Surf condition rating from wave height and period.
//!
//! The score multiplies height by a normalized period so that a long-period
//! swell rates higher than wind chop of the same height:
//!
//! ```text
//! score = height_m * (period_s / 10)
//! ```
//!
//! | score      | rating    |
//! |------------|-----------|
//! | >= 3.5     | excellent |
//! | >= 2.5     | good      |
//! | >= 1.5     | fair      |
//! | otherwise  | poor      |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisor bringing a typical 5-20 s period to the scale of a 0.5-5 m height.
pub const PERIOD_NORMALIZATION: f64 = 10.0;

const EXCELLENT_MIN: f64 = 3.5;
const GOOD_MIN: f64 = 2.5;
const FAIR_MIN: f64 = 1.5;

/// Qualitative surf rating, ordered from worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SurfRating {
    pub fn label(self) -> &'static str {
        match self {
            SurfRating::Poor => "poor",
            SurfRating::Fair => "fair",
            SurfRating::Good => "good",
            SurfRating::Excellent => "excellent",
        }
    }
}

impl fmt::Display for SurfRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw surf score for a height (m) and period (s).
pub fn score(height: f64, period: f64) -> f64 {
    height * (period / PERIOD_NORMALIZATION)
}

/// Rate surf conditions. Total over all inputs; a NaN score rates poor.
///
/// # Example
/// ```
/// use cape_surf_lib::surf::{rate, SurfRating};
///
/// assert_eq!(rate(2.0, 12.0), SurfRating::Fair);
/// assert_eq!(rate(3.0, 14.0), SurfRating::Excellent);
/// ```
pub fn rate(height: f64, period: f64) -> SurfRating {
    let s = score(height, period);
    if s >= EXCELLENT_MIN {
        SurfRating::Excellent
    } else if s >= GOOD_MIN {
        SurfRating::Good
    } else if s >= FAIR_MIN {
        SurfRating::Fair
    } else {
        SurfRating::Poor
    }
}
