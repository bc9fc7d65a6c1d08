//! Price table for rug cleaning.
//!
//! Prices are quoted per square meter and looked up by service package and
//! pile type. A flat fee is added once when odor removal is requested.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use rug_core::{Package, Pile, PricingTable};
//!
//! let table = PricingTable::default();
//!
//! assert_eq!(table.price_per_unit(Package::Standard, Pile::Long), dec!(11));
//! assert_eq!(table.odor_removal_fee, dec!(25));
//! assert!(table.validate().is_ok());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Package, Pile};

/// Errors raised when a price table is not usable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A per-area rate must be strictly positive.
    #[error("price for {package} / {pile} pile must be positive, got {rate}")]
    NonPositiveRate {
        package: &'static str,
        pile: &'static str,
        rate: Decimal,
    },

    /// The odor removal fee must be strictly positive.
    #[error("odor removal fee must be positive, got {0}")]
    NonPositiveFee(Decimal),
}

/// Per-area rates of one package, one entry per pile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileRates {
    pub short: Decimal,
    pub long: Decimal,
}

impl PileRates {
    pub fn get(
        &self,
        pile: Pile,
    ) -> Decimal {
        match pile {
            Pile::Short => self.short,
            Pile::Long => self.long,
        }
    }
}

/// Package × pile price grid plus the add-on fee.
///
/// Loaded once at startup and shared read-only for the rest of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTable {
    pub standard: PileRates,
    pub premium: PileRates,
    /// Flat surcharge for odor removal, applied at most once.
    pub odor_removal_fee: Decimal,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            standard: PileRates {
                short: Decimal::from(10),
                long: Decimal::from(11),
            },
            premium: PileRates {
                short: Decimal::from(13),
                long: Decimal::from(15),
            },
            odor_removal_fee: Decimal::from(25),
        }
    }
}

impl PricingTable {
    /// Rates for both pile types of `package`, as shown on the pile step.
    pub fn pile_rates(
        &self,
        package: Package,
    ) -> PileRates {
        match package {
            Package::Standard => self.standard,
            Package::Premium => self.premium,
        }
    }

    /// Price per square meter for one package and pile combination.
    pub fn price_per_unit(
        &self,
        package: Package,
        pile: Pile,
    ) -> Decimal {
        self.pile_rates(package).get(pile)
    }

    /// Checks that all four rates and the fee are positive.
    ///
    /// # Errors
    ///
    /// Returns the first offending entry as a [`PricingError`].
    pub fn validate(&self) -> Result<(), PricingError> {
        for package in Package::all() {
            for pile in Pile::all() {
                let rate = self.price_per_unit(*package, *pile);
                if rate <= Decimal::ZERO {
                    return Err(PricingError::NonPositiveRate {
                        package: package.as_str(),
                        pile: pile.as_str(),
                        rate,
                    });
                }
            }
        }
        if self.odor_removal_fee <= Decimal::ZERO {
            return Err(PricingError::NonPositiveFee(self.odor_removal_fee));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // lookup tests
    // =========================================================================

    #[test]
    fn default_table_has_four_fixed_rates() {
        let table = PricingTable::default();

        assert_eq!(table.price_per_unit(Package::Standard, Pile::Short), dec!(10));
        assert_eq!(table.price_per_unit(Package::Standard, Pile::Long), dec!(11));
        assert_eq!(table.price_per_unit(Package::Premium, Pile::Short), dec!(13));
        assert_eq!(table.price_per_unit(Package::Premium, Pile::Long), dec!(15));
    }

    #[test]
    fn pile_rates_match_individual_lookups() {
        let table = PricingTable::default();

        for package in Package::all() {
            let rates = table.pile_rates(*package);
            assert_eq!(rates.short, table.price_per_unit(*package, Pile::Short));
            assert_eq!(rates.long, table.price_per_unit(*package, Pile::Long));
        }
    }

    #[test]
    fn changing_one_rate_leaves_others_alone() {
        let mut table = PricingTable::default();
        table.premium.long = dec!(99);

        assert_eq!(table.price_per_unit(Package::Premium, Pile::Long), dec!(99));
        assert_eq!(table.price_per_unit(Package::Premium, Pile::Short), dec!(13));
        assert_eq!(table.price_per_unit(Package::Standard, Pile::Long), dec!(11));
        assert_eq!(table.price_per_unit(Package::Standard, Pile::Short), dec!(10));
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_default_table() {
        assert_eq!(PricingTable::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_rate() {
        let mut table = PricingTable::default();
        table.standard.long = dec!(0);

        assert_eq!(
            table.validate(),
            Err(PricingError::NonPositiveRate {
                package: "standard",
                pile: "long",
                rate: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_fee() {
        let mut table = PricingTable::default();
        table.odor_removal_fee = dec!(-5);

        assert_eq!(table.validate(), Err(PricingError::NonPositiveFee(dec!(-5))));
    }
}
