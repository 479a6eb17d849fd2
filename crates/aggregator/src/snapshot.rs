use crate::error::AggregatorError;
use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places used when rendering `sum_x` and `avg_x`.
const X_PLACES: i64 = 10;
/// Decimal places used when rendering `avg_y`.
const Y_AVG_PLACES: i64 = 3;

/// An immutable count/sum/average summary of the events in the rolling window.
///
/// This is the output of `RollingAggregator::snapshot`. It is built from a single
/// consistent read of the window totals and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total: usize,
    pub sum_x: BigDecimal,
    pub avg_x: BigDecimal,
    pub sum_y: i128,
    pub avg_y: BigDecimal,
}

impl StatsSnapshot {
    /// Derives the averages from the running totals.
    ///
    /// Returns `AggregatorError::EmptyWindow` when `total` is zero.
    pub fn from_totals(total: usize, sum_x: BigDecimal, sum_y: i128) -> Result<Self, AggregatorError> {
        if total == 0 {
            return Err(AggregatorError::EmptyWindow);
        }

        let count = BigDecimal::from(total as u64);
        // Division keeps bigdecimal's default 100 significant digits; rendering rounds again.
        let avg_x = &sum_x / &count;
        let avg_y = &BigDecimal::from(sum_y) / &count;

        Ok(Self {
            total,
            sum_x,
            avg_x,
            sum_y,
            avg_y,
        })
    }

    /// Renders the canonical `total,sum_x,avg_x,sum_y,avg_y` line.
    pub fn to_plain_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.total,
            fixed_places(&self.sum_x, X_PLACES),
            fixed_places(&self.avg_x, X_PLACES),
            self.sum_y,
            fixed_places(&self.avg_y, Y_AVG_PLACES),
        )
    }
}

/// Rounds half-up (midpoint away from zero) and pads to exactly `places` digits.
fn fixed_places(value: &BigDecimal, places: i64) -> String {
    value
        .with_scale_round(places, RoundingMode::HalfUp)
        .to_plain_string()
}
