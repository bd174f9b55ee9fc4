//! Short-horizon price forecasts for a trade intent.
//!
//! Direction is drawn independently of the order side: the forecast describes
//! where the price may go, not how the order would fill. The explanation is
//! always taken from the pool matching the drawn direction.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Catalog;
use crate::domain::error::MarketsimError;
use crate::domain::price_series::PRICE_FLOOR;
use crate::domain::rounding::round2;

pub const DEFAULT_UP_PROBABILITY: f64 = 0.6;
pub const MIN_CHANGE_PERCENT: f64 = 2.0;
pub const MAX_CHANGE_PERCENT: f64 = 10.0;
pub const MIN_CONFIDENCE: u8 = 70;
pub const MAX_CONFIDENCE: u8 = 90;
pub const HORIZON_DAYS: usize = 8;
/// Path noise is uniform in `[-NOISE_AMPLITUDE, NOISE_AMPLITUDE)`.
pub const NOISE_AMPLITUDE: f64 = 2.5;

const BULLISH_REASONS: &[&str] = &[
    "strong quarterly earnings and market momentum",
    "recent strategic partnerships and product launches",
    "favorable market conditions and sector growth",
    "technical indicators showing bullish patterns",
    "increased institutional investor confidence",
];

const BEARISH_REASONS: &[&str] = &[
    "market volatility and economic uncertainty",
    "sector-wide concerns affecting performance",
    "recent regulatory challenges impacting outlook",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(OrderSide::Buy),
            "sell" => Ok(OrderSide::Sell),
            other => Err(format!("unknown order side '{}' (expected buy or sell)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    fn movement(self) -> &'static str {
        match self {
            Direction::Up => "upward",
            Direction::Down => "downward",
        }
    }

    fn reasons(self) -> &'static [&'static str] {
        match self {
            Direction::Up => BULLISH_REASONS,
            Direction::Down => BEARISH_REASONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub label: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub symbol: String,
    pub side: OrderSide,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Magnitude of the move; the sign lives in `direction`.
    pub change_percent: f64,
    pub direction: Direction,
    pub confidence_percent: u8,
    pub explanation: String,
    pub path: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSimulator {
    up_probability: f64,
}

impl Default for ForecastSimulator {
    fn default() -> Self {
        ForecastSimulator {
            up_probability: DEFAULT_UP_PROBABILITY,
        }
    }
}

impl ForecastSimulator {
    /// Out-of-range values are clamped to `[0, 1]`. Non-finite values fall
    /// back to the default.
    pub fn new(up_probability: f64) -> Self {
        let up_probability = if !up_probability.is_finite() {
            DEFAULT_UP_PROBABILITY
        } else {
            up_probability.clamp(0.0, 1.0)
        };
        ForecastSimulator { up_probability }
    }

    pub fn up_probability(&self) -> f64 {
        self.up_probability
    }

    pub fn simulate<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        symbol: &str,
        side: OrderSide,
        rng: &mut R,
    ) -> Result<Forecast, MarketsimError> {
        let security = catalog.lookup(symbol)?;
        let current_price = security.quote_price;

        let direction = if rng.random_bool(self.up_probability) {
            Direction::Up
        } else {
            Direction::Down
        };
        let change_percent = rng.random_range(MIN_CHANGE_PERCENT..=MAX_CHANGE_PERCENT);
        let predicted_price =
            (current_price * (1.0 + change_percent / 100.0 * direction.sign())).max(PRICE_FLOOR);

        let last = (HORIZON_DAYS - 1) as f64;
        let path = (0..HORIZON_DAYS)
            .map(|i| {
                let progress = i as f64 / last;
                let noise = (rng.random::<f64>() - 0.5) * 2.0 * NOISE_AMPLITUDE;
                let price = current_price + (predicted_price - current_price) * progress + noise;
                ForecastPoint {
                    label: format!("Day {}", i + 1),
                    price: round2(price.max(PRICE_FLOOR)),
                }
            })
            .collect();

        let confidence_percent = rng.random_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);
        let reason = direction
            .reasons()
            .choose(rng)
            .copied()
            .unwrap_or("current market conditions");
        let explanation = format!(
            "Based on {}, our model predicts {} movement in the coming week.",
            reason,
            direction.movement()
        );

        tracing::debug!(
            symbol = %security.symbol,
            %side,
            ?direction,
            change_percent,
            confidence_percent,
            "simulated forecast"
        );

        Ok(Forecast {
            symbol: security.symbol.clone(),
            side,
            current_price,
            predicted_price: round2(predicted_price),
            change_percent: round2(change_percent),
            direction,
            confidence_percent,
            explanation,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn simulate(seed: u64, side: OrderSide) -> Forecast {
        let mut rng = StdRng::seed_from_u64(seed);
        ForecastSimulator::default()
            .simulate(&Catalog::builtin(), "AAPL", side, &mut rng)
            .unwrap()
    }

    #[test]
    fn forecast_bounds_hold_across_seeds() {
        for seed in 0..200 {
            let f = simulate(seed, OrderSide::Buy);
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&f.confidence_percent));
            assert!((2.0..=10.0).contains(&f.change_percent));
            assert_eq!(f.path.len(), 8);
        }
    }

    #[test]
    fn predicted_price_follows_direction() {
        for seed in 0..100 {
            let f = simulate(seed, OrderSide::Sell);
            match f.direction {
                Direction::Up => assert!(f.predicted_price > f.current_price),
                Direction::Down => assert!(f.predicted_price < f.current_price),
            }
        }
    }

    #[test]
    fn explanation_matches_direction() {
        for seed in 0..100 {
            let f = simulate(seed, OrderSide::Buy);
            let pool = f.direction.reasons();
            assert!(pool.iter().any(|r| f.explanation.contains(r)), "{}", f.explanation);
            assert!(f.explanation.contains(f.direction.movement()));
        }
    }

    #[test]
    fn path_labels_and_endpoints() {
        let f = simulate(17, OrderSide::Buy);
        let labels: Vec<&str> = f.path.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Day 1", "Day 2", "Day 3", "Day 4", "Day 5", "Day 6", "Day 7", "Day 8"]
        );
        assert!((f.path[0].price - f.current_price).abs() <= NOISE_AMPLITUDE + 0.01);
        assert!((f.path[7].price - f.predicted_price).abs() <= NOISE_AMPLITUDE + 0.01);
    }

    #[test]
    fn current_price_is_quote_price() {
        let f = simulate(1, OrderSide::Buy);
        assert_eq!(f.symbol, "AAPL");
        assert_eq!(f.current_price, 185.42);
    }

    #[test]
    fn order_side_does_not_bias_direction() {
        for seed in 0..50 {
            let buy = simulate(seed, OrderSide::Buy);
            let sell = simulate(seed, OrderSide::Sell);
            assert_eq!(buy.direction, sell.direction);
            assert_eq!(buy.predicted_price, sell.predicted_price);
        }
    }

    #[test]
    fn non_finite_probability_uses_default() {
        let simulator = ForecastSimulator::new(f64::NAN);
        assert_eq!(simulator.up_probability(), DEFAULT_UP_PROBABILITY);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(simulator
            .simulate(&Catalog::builtin(), "AAPL", OrderSide::Buy, &mut rng)
            .is_ok());
        assert_eq!(ForecastSimulator::new(f64::INFINITY).up_probability(), DEFAULT_UP_PROBABILITY);
        assert_eq!(ForecastSimulator::new(7.0).up_probability(), 1.0);
        assert_eq!(ForecastSimulator::new(-3.0).up_probability(), 0.0);
    }

    #[test]
    fn probability_extremes() {
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let always_up = ForecastSimulator::new(1.0);
        let always_down = ForecastSimulator::new(0.0);
        for _ in 0..20 {
            let up = always_up.simulate(&catalog, "NVDA", OrderSide::Buy, &mut rng).unwrap();
            assert_eq!(up.direction, Direction::Up);
            let down = always_down.simulate(&catalog, "NVDA", OrderSide::Buy, &mut rng).unwrap();
            assert_eq!(down.direction, Direction::Down);
        }
    }

    #[test]
    fn unknown_symbol_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = ForecastSimulator::default()
            .simulate(&Catalog::builtin(), "XYZ", OrderSide::Buy, &mut rng)
            .unwrap_err();
        assert!(matches!(err, MarketsimError::UnknownSymbol { .. }));
    }

    #[test]
    fn order_side_parse() {
        assert_eq!("BUY".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!(" sell ".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("hold".parse::<OrderSide>().is_err());
    }
}
