//! Portfolio aggregation over a list of positions.
//!
//! Aggregation is per-item resilient: a degenerate position (zero cost basis)
//! is valued with a zero P&L percent and reported as a warning, and the rest
//! of the portfolio is still aggregated.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::position::{Position, ValuedPosition};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub total_pl: f64,
    pub total_pl_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationWarning {
    ZeroCostBasis { symbol: String },
}

impl AggregationWarning {
    pub fn symbol(&self) -> &str {
        match self {
            AggregationWarning::ZeroCostBasis { symbol } => symbol,
        }
    }

    /// Same tag the JSON report uses.
    pub fn kind(&self) -> &'static str {
        match self {
            AggregationWarning::ZeroCostBasis { .. } => "zero_cost_basis",
        }
    }
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationWarning::ZeroCostBasis { symbol } => {
                write!(f, "{}: zero cost basis, P&L percent reported as 0", symbol)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Gainers,
    Losers,
}

impl FromStr for PositionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PositionFilter::All),
            "gainers" => Ok(PositionFilter::Gainers),
            "losers" => Ok(PositionFilter::Losers),
            other => Err(format!(
                "unknown filter '{}' (expected all, gainers or losers)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub positions: Vec<ValuedPosition>,
    pub totals: PortfolioTotals,
    pub warnings: Vec<AggregationWarning>,
}

impl PortfolioSummary {
    /// Rows whose symbol or name contains `search` and whose P&L sign passes
    /// `filter`. Totals are unaffected.
    pub fn filter(&self, search: &str, filter: PositionFilter) -> Vec<&ValuedPosition> {
        self.positions
            .iter()
            .filter(|row| row.matches_search(search))
            .filter(|row| match filter {
                PositionFilter::All => true,
                PositionFilter::Gainers => row.is_gainer(),
                PositionFilter::Losers => row.is_loser(),
            })
            .collect()
    }
}

pub fn aggregate(positions: &[Position]) -> PortfolioSummary {
    let warnings: Vec<AggregationWarning> = positions
        .iter()
        .filter(|p| p.has_zero_cost_basis())
        .map(|p| {
            tracing::warn!(symbol = %p.symbol, "position has zero cost basis");
            AggregationWarning::ZeroCostBasis {
                symbol: p.symbol.clone(),
            }
        })
        .collect();

    let rows: Vec<ValuedPosition> = positions.iter().map(ValuedPosition::from).collect();

    let (total_value, total_pl) = rows.iter().fold((0.0, 0.0), |(value, pl), row| {
        (value + row.total_value, pl + row.pl_amount)
    });
    let cost = total_value - total_pl;
    let total_pl_percent = if cost == 0.0 {
        0.0
    } else {
        total_pl / cost * 100.0
    };

    tracing::debug!(
        positions = rows.len(),
        total_value,
        total_pl,
        warnings = warnings.len(),
        "aggregated portfolio"
    );

    PortfolioSummary {
        positions: rows,
        totals: PortfolioTotals {
            total_value,
            total_pl,
            total_pl_percent,
        },
        warnings,
    }
}
