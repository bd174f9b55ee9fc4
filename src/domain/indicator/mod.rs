//! Technical indicators over a synthetic price path.
//!
//! - `IndicatorType`: indicator identity + period, used for labels
//! - `IndicatorSample`: one row per price point with SMA, EMA and RSI
//! - `IndicatorEngine`: validates a series and computes all three indicators
//!
//! The raw series functions in the submodules work on plain price slices and
//! do no rounding; the engine rounds every sample field to 2 decimals.

pub mod ema;
pub mod rsi;
pub mod sma;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::MarketsimError;
use crate::domain::price_series::PricePoint;
use crate::domain::rounding::round2;

pub const DEFAULT_SMA_PERIOD: usize = 20;
pub const DEFAULT_EMA_PERIOD: usize = 12;
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSample {
    pub date: NaiveDate,
    pub price: f64,
    /// Absent until a full SMA window of history exists.
    pub sma: Option<f64>,
    pub ema: f64,
    pub rsi: f64,
}

/// Where the EMA recurrence starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EmaSeed {
    #[default]
    FirstPrice,
    Value(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorEngine {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub ema_seed: EmaSeed,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        IndicatorEngine {
            sma_period: DEFAULT_SMA_PERIOD,
            ema_period: DEFAULT_EMA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            ema_seed: EmaSeed::FirstPrice,
        }
    }
}

impl IndicatorEngine {
    pub fn with_ema_seed(mut self, seed: EmaSeed) -> Self {
        self.ema_seed = seed;
        self
    }

    pub fn indicator_types(&self) -> [IndicatorType; 3] {
        [
            IndicatorType::Sma(self.sma_period),
            IndicatorType::Ema(self.ema_period),
            IndicatorType::Rsi(self.rsi_period),
        ]
    }

    /// Compute one sample per point, in the same date order.
    ///
    /// The whole call fails if the series has a gap, a duplicate or
    /// out-of-order date, or a non-positive price.
    pub fn compute(&self, series: &[PricePoint]) -> Result<Vec<IndicatorSample>, MarketsimError> {
        validate_series(series)?;
        if series.is_empty() {
            return Ok(Vec::new());
        }

        let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
        let seed = match self.ema_seed {
            EmaSeed::FirstPrice => prices[0],
            EmaSeed::Value(v) => v,
        };

        let sma = sma::calculate_sma(&prices, self.sma_period);
        let ema = ema::calculate_ema(&prices, self.ema_period, seed);
        let rsi = rsi::calculate_rsi(&prices, self.rsi_period);

        let samples: Vec<IndicatorSample> = series
            .iter()
            .zip(sma)
            .zip(ema)
            .zip(rsi)
            .map(|(((point, sma), ema), rsi)| IndicatorSample {
                date: point.date,
                price: point.price,
                sma: sma.map(round2),
                ema: round2(ema),
                rsi: round2(rsi),
            })
            .collect();

        tracing::debug!(
            samples = samples.len(),
            indicators = ?self.indicator_types().map(|t| t.to_string()),
            "computed indicators"
        );
        Ok(samples)
    }
}

/// Check that a series is gap-free, strictly daily and strictly positive.
pub fn validate_series(series: &[PricePoint]) -> Result<(), MarketsimError> {
    if let Some(point) = series.iter().find(|p| !(p.price.is_finite() && p.price > 0.0)) {
        return Err(MarketsimError::InvalidSeries {
            reason: format!("non-positive price {} on {}", point.price, point.date),
        });
    }

    for pair in series.windows(2) {
        if pair[0].date.succ_opt() != Some(pair[1].date) {
            return Err(MarketsimError::InvalidSeries {
                reason: format!(
                    "{} does not directly follow {}",
                    pair[1].date, pair[0].date
                ),
            });
        }
    }
    Ok(())
}
