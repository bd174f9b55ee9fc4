//! Report output port.
//!
//! Renderers and exporters only ever see plain serializable values.

use std::io::Write;

use crate::domain::catalog::Security;
use crate::domain::error::MarketsimError;
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorSample;
use crate::domain::portfolio::{AggregationWarning, PortfolioTotals};
use crate::domain::position::ValuedPosition;
use crate::domain::price_series::PricePoint;

pub trait ReportPort {
    fn write_catalog(&self, out: &mut dyn Write, securities: &[&Security]) -> Result<(), MarketsimError>;

    fn write_series(&self, out: &mut dyn Write, series: &[PricePoint]) -> Result<(), MarketsimError>;

    fn write_indicators(
        &self,
        out: &mut dyn Write,
        samples: &[IndicatorSample],
    ) -> Result<(), MarketsimError>;

    fn write_forecast(&self, out: &mut dyn Write, forecast: &Forecast) -> Result<(), MarketsimError>;

    fn write_portfolio(
        &self,
        out: &mut dyn Write,
        rows: &[&ValuedPosition],
        totals: &PortfolioTotals,
        warnings: &[AggregationWarning],
    ) -> Result<(), MarketsimError>;
}
