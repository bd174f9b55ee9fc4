//! Core domain types and logic.

pub mod catalog;
pub mod price_series;
pub mod indicator;
pub mod forecast;
pub mod position;
pub mod portfolio;
pub mod rounding;
pub mod config_validation;
pub mod error;
