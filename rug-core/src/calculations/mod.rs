//! Quote calculations.
//!
//! Dimension validation, area and total price derivation, and the rounding
//! helpers the formatter applies at presentation time.

pub mod common;
pub mod quote;

pub use quote::{
    ComputedResult, MAX_DIMENSION_METERS, QuoteError, ResultComputer, validate_dimensions,
};
