//! In-progress selections collected by the wizard.

use rust_decimal::Decimal;

use super::{Package, Pile};

/// Selections made so far.
///
/// Created empty when the wizard starts and replaced wholesale by
/// [`WizardState::default`] when the user asks for a new calculation.
/// `pile` is only priced once `package` is set as well; the dimensions are
/// independent of both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub package: Option<Package>,
    pub pile: Option<Pile>,
    /// Rug length in meters.
    pub length: Option<Decimal>,
    /// Rug width in meters.
    pub width: Option<Decimal>,
    pub odor_removal: bool,
    /// Free text, never validated.
    pub order_number: String,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Area shown while the user is still typing dimensions.
    ///
    /// Only available once both sides are positive; no upper bound is
    /// applied here, that is left to dimension validation.
    pub fn area_preview(&self) -> Option<Decimal> {
        match (self.length, self.width) {
            (Some(length), Some(width)) if length > Decimal::ZERO && width > Decimal::ZERO => {
                length.checked_mul(width)
            }
            _ => None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.package.is_some() && self.pile.is_some()
    }
}
