//! Asynchronous forecast requests.
//!
//! A request waits out the configured latency on the tokio timer before the
//! simulator runs. Dropping the returned future (or losing a
//! `tokio::time::timeout` race) cancels the request; nothing is computed
//! or recorded for a cancelled request.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::catalog::Catalog;
use crate::domain::error::MarketsimError;
use crate::domain::forecast::{Forecast, ForecastSimulator, OrderSide};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct DelayedForecaster {
    simulator: ForecastSimulator,
    catalog: Catalog,
    latency: Duration,
}

impl DelayedForecaster {
    pub fn new(simulator: ForecastSimulator, catalog: Catalog) -> Self {
        DelayedForecaster {
            simulator,
            catalog,
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Forecast `symbol` after the configured latency.
    ///
    /// The symbol is checked up front so an unknown symbol fails without
    /// waiting. With `seed` the result is reproducible.
    pub async fn forecast(
        &self,
        symbol: &str,
        side: OrderSide,
        seed: Option<u64>,
    ) -> Result<Forecast, MarketsimError> {
        self.catalog.lookup(symbol)?;

        tracing::debug!(symbol, %side, latency_ms = self.latency.as_millis() as u64, "forecast requested");
        tokio::time::sleep(self.latency).await;

        // Built after the await so the future stays Send.
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.simulator.simulate(&self.catalog, symbol, side, &mut rng)
    }
}
