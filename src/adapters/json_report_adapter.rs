//! JSON report adapter.

use std::io::Write;

use serde::Serialize;

use crate::domain::catalog::Security;
use crate::domain::error::MarketsimError;
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorSample;
use crate::domain::portfolio::{AggregationWarning, PortfolioTotals};
use crate::domain::position::ValuedPosition;
use crate::domain::price_series::PricePoint;
use crate::domain::rounding::round2;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct PositionView<'a> {
    symbol: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    quantity: u64,
    avg_buy_price: f64,
    current_price: f64,
    total_value: f64,
    pl_amount: f64,
    pl_percent: f64,
}

impl<'a> From<&'a ValuedPosition> for PositionView<'a> {
    fn from(row: &'a ValuedPosition) -> Self {
        PositionView {
            symbol: &row.symbol,
            name: row.name.as_deref(),
            quantity: row.quantity,
            avg_buy_price: row.avg_buy_price,
            current_price: row.current_price,
            total_value: round2(row.total_value),
            pl_amount: round2(row.pl_amount),
            pl_percent: round2(row.pl_percent),
        }
    }
}

#[derive(Serialize)]
struct PortfolioView<'a> {
    positions: Vec<PositionView<'a>>,
    totals: PortfolioTotals,
    warnings: &'a [AggregationWarning],
}

/// Pretty-printed JSON, one document per report, newline terminated.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    fn write_value<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), MarketsimError> {
        serde_json::to_writer_pretty(&mut *out, value).map_err(|e| MarketsimError::Report {
            reason: format!("JSON write error: {}", e),
        })?;
        writeln!(out)?;
        Ok(())
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_catalog(&self, out: &mut dyn Write, securities: &[&Security]) -> Result<(), MarketsimError> {
        Self::write_value(out, securities)
    }

    fn write_series(&self, out: &mut dyn Write, series: &[PricePoint]) -> Result<(), MarketsimError> {
        Self::write_value(out, series)
    }

    fn write_indicators(
        &self,
        out: &mut dyn Write,
        samples: &[IndicatorSample],
    ) -> Result<(), MarketsimError> {
        Self::write_value(out, samples)
    }

    fn write_forecast(&self, out: &mut dyn Write, forecast: &Forecast) -> Result<(), MarketsimError> {
        Self::write_value(out, forecast)
    }

    fn write_portfolio(
        &self,
        out: &mut dyn Write,
        rows: &[&ValuedPosition],
        totals: &PortfolioTotals,
        warnings: &[AggregationWarning],
    ) -> Result<(), MarketsimError> {
        let view = PortfolioView {
            positions: rows.iter().map(|row| PositionView::from(*row)).collect(),
            totals: PortfolioTotals {
                total_value: round2(totals.total_value),
                total_pl: round2(totals.total_pl),
                total_pl_percent: round2(totals.total_pl_percent),
            },
            warnings,
        };
        Self::write_value(out, &view)
    }
}
