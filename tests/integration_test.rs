//! End-to-end domain pipelines.
//!
//! Tests cover:
//! - Generated series feeding the indicator engine
//! - Indicator engine over a supplied series (gaps rejected as a whole)
//! - Portfolio aggregation through an input port, with filtering
//! - Async forecasts: seeded reproducibility, timeout, concurrency

mod common;

use approx::assert_relative_eq;
use common::*;
use marketsim::adapters::forecast_task::DelayedForecaster;
use marketsim::domain::catalog::Catalog;
use marketsim::domain::error::MarketsimError;
use marketsim::domain::forecast::{Direction, ForecastSimulator, OrderSide};
use marketsim::domain::indicator::{EmaSeed, IndicatorEngine};
use marketsim::domain::portfolio::{AggregationWarning, PositionFilter, aggregate};
use marketsim::domain::position::Position;
use marketsim::domain::price_series::PriceSeriesGenerator;
use marketsim::ports::input_port::InputPort;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

mod series_to_indicators {
    use super::*;

    #[test]
    fn two_month_window_for_aapl() {
        let mut rng = StdRng::seed_from_u64(42);
        let series = PriceSeriesGenerator::default()
            .generate_for(&Catalog::builtin(), "aapl", date(2025, 7, 1), date(2025, 8, 31), &mut rng)
            .unwrap();
        assert_eq!(series.len(), 62);

        let samples = IndicatorEngine::default().compute(&series).unwrap();
        assert_eq!(samples.len(), 62);
        assert!(samples[..19].iter().all(|s| s.sma.is_none()));
        assert!(samples[19..].iter().all(|s| s.sma.is_some()));
        assert!(samples[..=14].iter().all(|s| s.rsi == 50.0));
        assert_eq!(samples[0].ema, samples[0].price);
        for (sample, point) in samples.iter().zip(&series) {
            assert_eq!(sample.date, point.date);
            assert!((0.0..=100.0).contains(&sample.rsi));
        }
    }

    #[test]
    fn same_seed_same_everything() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let series = PriceSeriesGenerator::default()
                .generate_for(&Catalog::builtin(), "NVDA", date(2025, 1, 1), date(2025, 3, 1), &mut rng)
                .unwrap();
            IndicatorEngine::default().compute(&series).unwrap()
        };
        assert_eq!(run(5), run(5));
        assert_ne!(run(5), run(6));
    }

    #[test]
    fn base_price_seed_starts_ema_at_base() {
        let mut rng = StdRng::seed_from_u64(1);
        let catalog = Catalog::builtin();
        let series = PriceSeriesGenerator::default()
            .generate_for(&catalog, "MSFT", date(2025, 7, 1), date(2025, 7, 10), &mut rng)
            .unwrap();
        let base = catalog.lookup("MSFT").unwrap().base_price;
        let samples = IndicatorEngine::default()
            .with_ema_seed(EmaSeed::Value(base))
            .compute(&series)
            .unwrap();
        assert_eq!(samples[0].ema, 410.0);
    }

    #[test]
    fn reversed_window_produces_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = PriceSeriesGenerator::default()
            .generate_for(&Catalog::builtin(), "AAPL", date(2025, 8, 1), date(2025, 7, 1), &mut rng)
            .unwrap_err();
        assert!(matches!(err, MarketsimError::InvalidRange { .. }));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = PriceSeriesGenerator::default()
            .generate_for(&Catalog::builtin(), "ZZZZ", date(2025, 7, 1), date(2025, 7, 2), &mut rng)
            .unwrap_err();
        assert!(matches!(err, MarketsimError::UnknownSymbol { .. }));
    }
}

mod supplied_series {
    use super::*;

    #[test]
    fn indicators_over_input_port_series() {
        let prices: Vec<f64> = (1..=30).map(|i| 100.0 + i as f64).collect();
        let port = MockInputPort::new().with_series("s.csv", daily_series(date(2025, 1, 1), &prices));

        let series = port.read_price_series("s.csv").unwrap();
        let samples = IndicatorEngine::default().compute(&series).unwrap();

        // Monotonic rise: no losses, so RS is pinned at 100.
        assert_eq!(samples[29].rsi, 99.01);
        // Mean of 111..=130.
        assert_relative_eq!(samples[29].sma.unwrap(), 120.5);
    }

    #[test]
    fn gap_rejects_entire_series() {
        let mut series = daily_series(date(2025, 1, 1), &[10.0, 11.0, 12.0, 13.0]);
        series[3].date = date(2025, 1, 6);
        let err = IndicatorEngine::default().compute(&series).unwrap_err();
        assert!(matches!(err, MarketsimError::InvalidSeries { .. }));
    }

    #[test]
    fn missing_input_is_an_input_error() {
        let err = MockInputPort::new().read_price_series("nope.csv").unwrap_err();
        assert!(matches!(err, MarketsimError::InputParse { .. }));
    }
}

mod portfolio_pipeline {
    use super::*;

    #[test]
    fn aggregate_positions_from_port() {
        let port = MockInputPort::new().with_positions("p.csv", sample_positions());
        let summary = aggregate(&port.read_positions("p.csv").unwrap());

        assert_eq!(summary.positions.len(), 3);
        let expected_value = 150.0 * 175.32 + 75.0 * 245.67 + 15.0 * 2758.42;
        assert_relative_eq!(summary.totals.total_value, expected_value, epsilon = 1e-6);
        let expected_pl = 1485.0 + 75.0 * (245.67 - 238.15) + 15.0 * (2758.42 - 2801.33);
        assert_relative_eq!(summary.totals.total_pl, expected_pl, epsilon = 1e-6);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn filter_does_not_change_totals() {
        let summary = aggregate(&sample_positions());
        let totals = summary.totals;
        let losers = summary.filter("", PositionFilter::Losers);
        assert_eq!(losers.len(), 1);
        assert_eq!(summary.totals, totals);
    }

    #[test]
    fn degenerate_position_is_reported_not_fatal() {
        let mut positions = sample_positions();
        positions.push(Position::new("GIFT", 4, 0.0, 10.0));
        let summary = aggregate(&positions);

        assert_eq!(summary.positions.len(), 4);
        assert_eq!(summary.positions[3].pl_percent, 0.0);
        assert_eq!(
            summary.warnings,
            vec![AggregationWarning::ZeroCostBasis { symbol: "GIFT".into() }]
        );
    }
}

mod async_forecasts {
    use super::*;

    fn forecaster(latency_ms: u64) -> DelayedForecaster {
        DelayedForecaster::new(ForecastSimulator::default(), Catalog::builtin())
            .with_latency(Duration::from_millis(latency_ms))
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_requests_are_reproducible() {
        let f = forecaster(1500);
        let a = f.forecast("TSLA", OrderSide::Sell, Some(11)).await.unwrap();
        let b = f.forecast("TSLA", OrderSide::Sell, Some(11)).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.current_price, 238.15);
        assert_eq!(a.path.len(), 8);
        match a.direction {
            Direction::Up => assert!(a.predicted_price > a.current_price),
            Direction::Down => assert!(a.predicted_price < a.current_price),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn request_completes_only_after_latency() {
        let f = forecaster(1500);
        let start = tokio::time::Instant::now();
        f.forecast("AAPL", OrderSide::Buy, Some(1)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_request_yields_nothing() {
        let f = forecaster(1500);
        let outcome =
            tokio::time::timeout(Duration::from_millis(1499), f.forecast("AAPL", OrderSide::Buy, None)).await;
        assert!(outcome.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn joined_requests_all_complete() {
        let f = forecaster(200);
        let (a, b, c) = tokio::join!(
            f.forecast("AAPL", OrderSide::Buy, Some(1)),
            f.forecast("GOOGL", OrderSide::Sell, Some(2)),
            f.forecast("AMZN", OrderSide::Buy, Some(3)),
        );
        assert_eq!(a.unwrap().symbol, "AAPL");
        assert_eq!(b.unwrap().current_price, 142.87);
        assert_eq!(c.unwrap().symbol, "AMZN");
    }
}
