//! Rounding helpers shared by the formatters.
//!
//! Rounding only ever happens when a value is presented. Calculations keep
//! full precision and hand the raw values to these functions at the end.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an area to exactly one decimal place, half away from zero.
///
/// The result always carries scale 1, so `6` renders as `6.0`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use rug_core::calculations::common::round_area;
///
/// assert_eq!(round_area(dec!(6)).to_string(), "6.0");
/// assert_eq!(round_area(dec!(7.25)).to_string(), "7.3");
/// assert_eq!(round_area(dec!(7.24)).to_string(), "7.2");
/// ```
pub fn round_area(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded
}

/// Rounds a price to the nearest whole currency unit, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use rug_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(66.00)), 66);
/// assert_eq!(round_whole(dec!(82.5)), 83);
/// assert_eq!(round_whole(dec!(82.49)), 82);
/// ```
pub fn round_whole(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(if value.is_sign_negative() { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_area tests
    // =========================================================================

    #[test]
    fn round_area_pads_integers_to_one_place() {
        let result = round_area(dec!(10));

        assert_eq!(result.to_string(), "10.0");
    }

    #[test]
    fn round_area_rounds_up_at_midpoint() {
        let result = round_area(dec!(3.75));

        assert_eq!(result, dec!(3.8));
    }

    #[test]
    fn round_area_rounds_down_below_midpoint() {
        let result = round_area(dec!(3.7499));

        assert_eq!(result.to_string(), "3.7");
    }

    #[test]
    fn round_area_trims_extra_scale() {
        let result = round_area(dec!(6.0000));

        assert_eq!(result.to_string(), "6.0");
    }

    // =========================================================================
    // round_whole tests
    // =========================================================================

    #[test]
    fn round_whole_keeps_exact_integers() {
        assert_eq!(round_whole(dec!(130.00)), 130);
    }

    #[test]
    fn round_whole_rounds_up_at_midpoint() {
        assert_eq!(round_whole(dec!(90.5)), 91);
    }

    #[test]
    fn round_whole_rounds_down_below_midpoint() {
        assert_eq!(round_whole(dec!(90.4999)), 90);
    }

    #[test]
    fn round_whole_handles_zero() {
        assert_eq!(round_whole(dec!(0.0)), 0);
    }
}
