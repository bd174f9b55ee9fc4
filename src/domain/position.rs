//! Held positions and their derived valuation.
//!
//! Only quantity, average cost and current price are stored. Value and P&L
//! are methods, recomputed on every call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: u64,
    pub avg_buy_price: f64,
    pub current_price: f64,
}

impl Position {
    pub fn new(symbol: &str, quantity: u64, avg_buy_price: f64, current_price: f64) -> Self {
        Position {
            symbol: symbol.to_string(),
            name: None,
            quantity,
            avg_buy_price,
            current_price,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// quantity * current_price
    pub fn total_value(&self) -> f64 {
        self.quantity as f64 * self.current_price
    }

    /// quantity * avg_buy_price
    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.avg_buy_price
    }

    pub fn pl_amount(&self) -> f64 {
        self.total_value() - self.cost_basis()
    }

    /// P&L relative to cost basis, in percent. Zero when the cost basis is zero.
    pub fn pl_percent(&self) -> f64 {
        let basis = self.cost_basis();
        if basis == 0.0 {
            0.0
        } else {
            self.pl_amount() / basis * 100.0
        }
    }

    pub fn has_zero_cost_basis(&self) -> bool {
        self.cost_basis() == 0.0
    }
}

/// A position together with its derived fields, as handed to renderers and
/// exporters. Built from a `Position`, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedPosition {
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: u64,
    pub avg_buy_price: f64,
    pub current_price: f64,
    pub total_value: f64,
    pub pl_amount: f64,
    pub pl_percent: f64,
}

impl From<&Position> for ValuedPosition {
    fn from(position: &Position) -> Self {
        ValuedPosition {
            symbol: position.symbol.clone(),
            name: position.name.clone(),
            quantity: position.quantity,
            avg_buy_price: position.avg_buy_price,
            current_price: position.current_price,
            total_value: position.total_value(),
            pl_amount: position.pl_amount(),
            pl_percent: position.pl_percent(),
        }
    }
}

impl ValuedPosition {
    pub fn is_gainer(&self) -> bool {
        self.pl_percent > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.pl_percent < 0.0
    }

    /// Case-insensitive substring match on symbol or name. An empty term matches.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.symbol.to_lowercase().contains(&term)
            || self
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&term))
    }
}
