#![allow(dead_code)]

use chrono::NaiveDate;
use marketsim::domain::error::MarketsimError;
use marketsim::domain::position::Position;
use marketsim::domain::price_series::PricePoint;
use marketsim::ports::input_port::InputPort;
use std::collections::HashMap;
use std::io::Write;

/// In-memory input port keyed by file name.
pub struct MockInputPort {
    pub positions: HashMap<String, Vec<Position>>,
    pub series: HashMap<String, Vec<PricePoint>>,
}

impl MockInputPort {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            series: HashMap::new(),
        }
    }

    pub fn with_positions(mut self, name: &str, positions: Vec<Position>) -> Self {
        self.positions.insert(name.to_string(), positions);
        self
    }

    pub fn with_series(mut self, name: &str, series: Vec<PricePoint>) -> Self {
        self.series.insert(name.to_string(), series);
        self
    }

    fn missing(name: &str) -> MarketsimError {
        MarketsimError::InputParse {
            file: name.to_string(),
            reason: "not found".to_string(),
        }
    }
}

impl InputPort for MockInputPort {
    fn read_positions(&self, name: &str) -> Result<Vec<Position>, MarketsimError> {
        self.positions.get(name).cloned().ok_or_else(|| Self::missing(name))
    }

    fn read_price_series(&self, name: &str) -> Result<Vec<PricePoint>, MarketsimError> {
        self.series.get(name).cloned().ok_or_else(|| Self::missing(name))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One point per consecutive day starting at `start`.
pub fn daily_series(start: NaiveDate, prices: &[f64]) -> Vec<PricePoint> {
    start
        .iter_days()
        .zip(prices)
        .map(|(date, &price)| PricePoint {
            date,
            price,
            volume: 1_000_000,
        })
        .collect()
}

pub fn sample_positions() -> Vec<Position> {
    vec![
        Position::new("AAPL", 150, 165.42, 175.32).with_name("Apple Inc."),
        Position::new("TSLA", 75, 238.15, 245.67).with_name("Tesla Inc."),
        Position::new("GOOGL", 15, 2801.33, 2758.42).with_name("Alphabet Inc."),
    ]
}

pub const POSITIONS_CSV: &str = "symbol,name,quantity,avg_buy_price,current_price
AAPL,Apple Inc.,150,165.42,175.32
TSLA,Tesla Inc.,75,238.15,245.67
GOOGL,Alphabet Inc.,15,2801.33,2758.42
";

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
