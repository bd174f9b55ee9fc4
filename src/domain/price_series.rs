//! Synthetic daily price paths (random walk with drift).
//!
//! Every calendar day between the two endpoints gets exactly one point; there
//! is no weekend or holiday calendar. Randomness is always supplied by the
//! caller so a seeded generator reproduces the same path.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Catalog;
use crate::domain::error::MarketsimError;
use crate::domain::rounding::round2;

pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Smallest price a path may hold.
pub const PRICE_FLOOR: f64 = 0.01;

pub const MIN_VOLUME: u64 = 1_000_000;
pub const MAX_VOLUME: u64 = 11_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSeriesGenerator {
    pub volatility: f64,
}

impl Default for PriceSeriesGenerator {
    fn default() -> Self {
        PriceSeriesGenerator {
            volatility: DEFAULT_VOLATILITY,
        }
    }
}

impl PriceSeriesGenerator {
    pub fn new(volatility: f64) -> Self {
        PriceSeriesGenerator { volatility }
    }

    /// Generate one point per day in `[start_date, end_date]`.
    ///
    /// Each day draws `u` in `[0, 1)` and moves the running price by
    /// `(u - 0.5) * volatility + drift_rate`. Fails with `InvalidRange` when
    /// `end_date` precedes `start_date`, and with `InvalidSeries` when the
    /// inputs are not finite or the walk overflows. No partial series is
    /// returned.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        base_price: f64,
        drift_rate: f64,
        rng: &mut R,
    ) -> Result<Vec<PricePoint>, MarketsimError> {
        if end_date < start_date {
            return Err(MarketsimError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        if !base_price.is_finite() || !drift_rate.is_finite() {
            return Err(MarketsimError::InvalidSeries {
                reason: format!(
                    "{symbol}: base price {base_price} and drift rate {drift_rate} must be finite"
                ),
            });
        }

        let days = (end_date - start_date).num_days() as usize + 1;
        let mut price = base_price.max(PRICE_FLOOR);
        let mut series = Vec::with_capacity(days);

        for date in start_date.iter_days().take(days) {
            let u: f64 = rng.random();
            let change = (u - 0.5) * self.volatility + drift_rate;
            price = (price * (1.0 + change)).max(PRICE_FLOOR);
            if !price.is_finite() {
                return Err(MarketsimError::InvalidSeries {
                    reason: format!("{symbol}: price overflowed on {date}"),
                });
            }
            series.push(PricePoint {
                date,
                price: round2(price).max(PRICE_FLOOR),
                volume: rng.random_range(MIN_VOLUME..MAX_VOLUME),
            });
        }

        tracing::debug!(
            symbol,
            %start_date,
            %end_date,
            points = series.len(),
            "generated price series"
        );
        Ok(series)
    }

    /// Generate a series using the catalog's base price and drift for `symbol`.
    pub fn generate_for<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<PricePoint>, MarketsimError> {
        let security = catalog.lookup(symbol)?;
        self.generate(
            &security.symbol,
            start_date,
            end_date,
            security.base_price,
            security.drift_rate,
            rng,
        )
    }
}

/// Inclusive number of calendar days between two dates.
pub fn inclusive_day_count(start_date: NaiveDate, end_date: NaiveDate) -> usize {
    if end_date < start_date {
        0
    } else {
        (end_date - start_date).num_days() as usize + 1
    }
}
