//! Supported securities and their simulation parameters.
//!
//! The catalog answers two separate questions: whether a symbol is supported
//! at all (identity, never defaulted) and which price level and drift the
//! synthetic history for it starts from.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::error::MarketsimError;

/// Starting price level for a configured security that does not name one.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Daily drift applied when a configured security does not name one.
pub const DEFAULT_DRIFT_RATE: f64 = 0.0002;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Security {
    pub symbol: String,
    pub name: String,
    /// Price the synthetic history starts from.
    pub base_price: f64,
    /// Current price used as the forecast starting point.
    pub quote_price: f64,
    pub drift_rate: f64,
}

impl Security {
    pub fn new(symbol: &str, name: &str, base_price: f64, quote_price: f64, drift_rate: f64) -> Self {
        Security {
            symbol: symbol.trim().to_uppercase(),
            name: name.to_string(),
            base_price,
            quote_price,
            drift_rate,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    securities: BTreeMap<String, Security>,
}

impl Catalog {
    pub fn empty() -> Self {
        Catalog::default()
    }

    /// The six large-cap names the application ships with.
    pub fn builtin() -> Self {
        let mut catalog = Catalog::empty();
        for security in [
            Security::new("AAPL", "Apple Inc.", 170.0, 185.42, 0.0002),
            Security::new("TSLA", "Tesla Inc.", 240.0, 238.15, 0.0005),
            Security::new("MSFT", "Microsoft Corp.", 410.0, 378.91, 0.0002),
            Security::new("GOOGL", "Alphabet Inc.", 2750.0, 142.87, 0.0002),
            Security::new("AMZN", "Amazon.com Inc.", 175.0, 155.73, 0.0002),
            Security::new("NVDA", "NVIDIA Corp.", 850.0, 721.33, 0.001),
        ] {
            catalog.insert(security);
        }
        catalog
    }

    /// Add or replace a security, keyed by its upper-cased symbol.
    pub fn insert(&mut self, security: Security) {
        self.securities.insert(security.symbol.clone(), security);
    }

    pub fn lookup(&self, symbol: &str) -> Result<&Security, MarketsimError> {
        self.securities
            .get(&symbol.trim().to_uppercase())
            .ok_or_else(|| MarketsimError::unknown_symbol(symbol))
    }

    /// All securities, ordered by symbol.
    pub fn securities(&self) -> impl Iterator<Item = &Security> {
        self.securities.values()
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}
