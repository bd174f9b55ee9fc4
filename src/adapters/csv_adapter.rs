//! CSV adapters: position/series input files and CSV report output.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::catalog::Security;
use crate::domain::error::MarketsimError;
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorSample;
use crate::domain::portfolio::{AggregationWarning, PortfolioTotals};
use crate::domain::position::{Position, ValuedPosition};
use crate::domain::price_series::PricePoint;
use crate::ports::input_port::InputPort;
use crate::ports::report_port::ReportPort;

/// Reads input files relative to `base_path`.
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn read_records<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, MarketsimError> {
        let path = self.base_path.join(name);
        let file = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| MarketsimError::InputParse {
            file: file.clone(),
            reason: e.to_string(),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        rdr.deserialize()
            .enumerate()
            .map(|(i, record)| {
                record.map_err(|e| MarketsimError::InputParse {
                    file: file.clone(),
                    reason: format!("row {}: {}", i + 1, e),
                })
            })
            .collect()
    }
}

impl InputPort for CsvAdapter {
    fn read_positions(&self, name: &str) -> Result<Vec<Position>, MarketsimError> {
        let positions: Vec<Position> = self.read_records(name)?;

        if let Some((i, p)) = positions.iter().enumerate().find(|(_, p)| {
            !(p.avg_buy_price.is_finite() && p.avg_buy_price >= 0.0)
                || !(p.current_price.is_finite() && p.current_price >= 0.0)
        }) {
            return Err(MarketsimError::InputParse {
                file: self.base_path.join(name).display().to_string(),
                reason: format!("row {}: {} has a negative or non-finite price", i + 1, p.symbol),
            });
        }

        tracing::debug!(file = name, positions = positions.len(), "read positions");
        Ok(positions)
    }

    fn read_price_series(&self, name: &str) -> Result<Vec<PricePoint>, MarketsimError> {
        let series: Vec<PricePoint> = self.read_records(name)?;
        tracing::debug!(file = name, points = series.len(), "read price series");
        Ok(series)
    }
}

#[derive(Serialize)]
struct CatalogRow<'a> {
    symbol: &'a str,
    name: &'a str,
    base_price: f64,
    quote_price: f64,
    drift_rate: f64,
}

#[derive(Serialize)]
struct IndicatorRow {
    date: String,
    price: String,
    sma: String,
    ema: String,
    rsi: String,
}

#[derive(Serialize)]
struct ForecastRow<'a> {
    symbol: &'a str,
    side: String,
    direction: String,
    confidence_percent: u8,
    label: &'a str,
    price: String,
}

#[derive(Serialize)]
struct PositionRow<'a> {
    symbol: &'a str,
    name: &'a str,
    quantity: u64,
    avg_buy_price: String,
    current_price: String,
    total_value: String,
    pl_amount: String,
    pl_percent: String,
    warning: &'a str,
}

fn cents(value: f64) -> String {
    format!("{:.2}", value)
}

/// Writes reports as comma-separated rows with a header line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    fn write_rows<T: Serialize>(
        out: &mut dyn Write,
        rows: impl IntoIterator<Item = T>,
    ) -> Result<(), MarketsimError> {
        let mut writer = csv::Writer::from_writer(out);
        for row in rows {
            writer.serialize(row).map_err(|e| MarketsimError::Report {
                reason: format!("CSV write error: {}", e),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_catalog(&self, out: &mut dyn Write, securities: &[&Security]) -> Result<(), MarketsimError> {
        Self::write_rows(
            out,
            securities.iter().map(|s| CatalogRow {
                symbol: &s.symbol,
                name: &s.name,
                base_price: s.base_price,
                quote_price: s.quote_price,
                drift_rate: s.drift_rate,
            }),
        )
    }

    fn write_series(&self, out: &mut dyn Write, series: &[PricePoint]) -> Result<(), MarketsimError> {
        Self::write_rows(out, series)
    }

    fn write_indicators(
        &self,
        out: &mut dyn Write,
        samples: &[IndicatorSample],
    ) -> Result<(), MarketsimError> {
        Self::write_rows(
            out,
            samples.iter().map(|s| IndicatorRow {
                date: s.date.to_string(),
                price: cents(s.price),
                sma: s.sma.map(cents).unwrap_or_default(),
                ema: cents(s.ema),
                rsi: cents(s.rsi),
            }),
        )
    }

    fn write_forecast(&self, out: &mut dyn Write, forecast: &Forecast) -> Result<(), MarketsimError> {
        Self::write_rows(
            out,
            forecast.path.iter().map(|point| ForecastRow {
                symbol: &forecast.symbol,
                side: forecast.side.to_string(),
                direction: forecast.direction.to_string(),
                confidence_percent: forecast.confidence_percent,
                label: &point.label,
                price: cents(point.price),
            }),
        )
    }

    fn write_portfolio(
        &self,
        out: &mut dyn Write,
        rows: &[&ValuedPosition],
        _totals: &PortfolioTotals,
        warnings: &[AggregationWarning],
    ) -> Result<(), MarketsimError> {
        Self::write_rows(
            out,
            rows.iter().map(|row| PositionRow {
                symbol: &row.symbol,
                name: row.name.as_deref().unwrap_or_default(),
                quantity: row.quantity,
                avg_buy_price: cents(row.avg_buy_price),
                current_price: cents(row.current_price),
                total_value: cents(row.total_value),
                pl_amount: cents(row.pl_amount),
                pl_percent: cents(row.pl_percent),
                warning: warnings
                    .iter()
                    .find(|w| w.symbol() == row.symbol)
                    .map(AggregationWarning::kind)
                    .unwrap_or_default(),
            }),
        )
    }
}
