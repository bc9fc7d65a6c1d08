//! Area and price derivation for a completed wizard.
//!
//! # Formula
//!
//! | Value | Derivation |
//! |-------|------------|
//! | area  | length × width |
//! | base  | area × price per unit (package, pile) |
//! | total | base + odor removal fee (when selected) |
//!
//! Nothing is rounded here. [`crate::format`] rounds area to one decimal
//! place and the total to a whole currency unit when the result is shown.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use rug_core::{Package, Pile, PricingTable, ResultComputer, WizardState};
//!
//! let table = PricingTable::default();
//! let state = WizardState {
//!     package: Some(Package::Standard),
//!     pile: Some(Pile::Long),
//!     length: Some(dec!(3.0)),
//!     width: Some(dec!(2.0)),
//!     odor_removal: true,
//!     order_number: String::new(),
//! };
//!
//! let result = ResultComputer::new(&table).compute(&state).unwrap();
//!
//! assert_eq!(result.area, dec!(6.0));
//! assert_eq!(result.total_price, dec!(91));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Package, Pile, PricingTable, WizardState};

/// Largest accepted length or width, in meters. The bound itself is allowed.
pub const MAX_DIMENSION_METERS: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Reasons a quote cannot be produced from the current selections.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Package or pile has not been chosen yet.
    #[error("service package and pile type must both be selected")]
    MissingSelection,

    /// Length or width is missing, zero or negative.
    #[error("rug dimensions must be positive numbers")]
    InvalidDimensions,

    /// Length or width is above the accepted ceiling.
    #[error("rug dimensions cannot exceed {max} meters")]
    DimensionsTooLarge { max: Decimal },

    /// The price does not fit in a decimal.
    #[error("price calculation overflowed")]
    PriceOverflow,
}

/// Checks the entered dimensions and returns them unwrapped.
///
/// # Errors
///
/// - [`QuoteError::InvalidDimensions`] if either side is missing, zero or negative.
/// - [`QuoteError::DimensionsTooLarge`] if either side exceeds
///   [`MAX_DIMENSION_METERS`].
pub fn validate_dimensions(
    length: Option<Decimal>,
    width: Option<Decimal>,
) -> Result<(Decimal, Decimal), QuoteError> {
    let (length, width) = match (length, width) {
        (Some(l), Some(w)) if l > Decimal::ZERO && w > Decimal::ZERO => (l, w),
        _ => return Err(QuoteError::InvalidDimensions),
    };

    if length > MAX_DIMENSION_METERS || width > MAX_DIMENSION_METERS {
        return Err(QuoteError::DimensionsTooLarge {
            max: MAX_DIMENSION_METERS,
        });
    }

    Ok((length, width))
}

/// Values derived from a completed [`WizardState`], at full precision.
///
/// Never stored as the source of truth: recompute it from the state
/// whenever it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedResult {
    pub package: Package,
    pub pile: Pile,
    pub length: Decimal,
    pub width: Decimal,

    /// length × width in square meters.
    pub area: Decimal,

    /// Rate applied from the price table.
    pub price_per_unit: Decimal,

    /// Whether the odor removal fee is part of the total.
    pub odor_removal: bool,

    /// Fee actually charged for add-ons (zero when none selected).
    pub add_on_fee: Decimal,

    /// area × price_per_unit + add_on_fee.
    pub total_price: Decimal,
}

/// Derives a [`ComputedResult`] from wizard selections.
///
/// Pure: the same state and table always give the same result.
#[derive(Debug, Clone, Copy)]
pub struct ResultComputer<'a> {
    pricing: &'a PricingTable,
}

impl<'a> ResultComputer<'a> {
    pub fn new(pricing: &'a PricingTable) -> Self {
        Self { pricing }
    }

    /// Computes area and total price.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] if a selection is missing, the dimensions do
    /// not validate, or the arithmetic overflows.
    pub fn compute(
        &self,
        state: &WizardState,
    ) -> Result<ComputedResult, QuoteError> {
        let (package, pile) = match (state.package, state.pile) {
            (Some(package), Some(pile)) => (package, pile),
            _ => return Err(QuoteError::MissingSelection),
        };
        let (length, width) = validate_dimensions(state.length, state.width)?;

        let area = self.area(length, width)?;
        let price_per_unit = self.pricing.price_per_unit(package, pile);
        let add_on_fee = self.add_on_fee(state.odor_removal);
        let total_price = self.total_price(area, price_per_unit, add_on_fee)?;

        Ok(ComputedResult {
            package,
            pile,
            length,
            width,
            area,
            price_per_unit,
            odor_removal: state.odor_removal,
            add_on_fee,
            total_price,
        })
    }

    fn area(
        &self,
        length: Decimal,
        width: Decimal,
    ) -> Result<Decimal, QuoteError> {
        length.checked_mul(width).ok_or(QuoteError::PriceOverflow)
    }

    fn add_on_fee(
        &self,
        odor_removal: bool,
    ) -> Decimal {
        if odor_removal {
            self.pricing.odor_removal_fee
        } else {
            Decimal::ZERO
        }
    }

    fn total_price(
        &self,
        area: Decimal,
        price_per_unit: Decimal,
        add_on_fee: Decimal,
    ) -> Result<Decimal, QuoteError> {
        area.checked_mul(price_per_unit)
            .and_then(|base| base.checked_add(add_on_fee))
            .ok_or(QuoteError::PriceOverflow)
    }
}
