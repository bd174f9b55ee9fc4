//! Input port: position and price-series files supplied by the caller.

use crate::domain::error::MarketsimError;
use crate::domain::position::Position;
use crate::domain::price_series::PricePoint;

pub trait InputPort {
    fn read_positions(&self, name: &str) -> Result<Vec<Position>, MarketsimError>;

    /// Points are returned in file order; ordering and gaps are checked by the
    /// indicator engine, not here.
    fn read_price_series(&self, name: &str) -> Result<Vec<PricePoint>, MarketsimError>;
}
