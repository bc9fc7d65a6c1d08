//! Output forms of a computed quote.
//!
//! Three independent builders read the same [`ComputedResult`] and
//! [`WizardState`]:
//!
//! - [`display_fields`]: labelled rows for the result screen and the image,
//! - [`text_summary`]: a plain-text block for the clipboard,
//! - [`share_payload`]: the structured payload handed to the host bridge.
//!
//! All of them take the area and total through [`area_text`] and
//! [`total_whole`], so every form reports the same rounded numbers.

use serde::{Deserialize, Serialize};

use crate::calculations::ComputedResult;
use crate::calculations::common::{round_area, round_whole};
use crate::{Labels, Package, Pile, WizardState};

/// Action name the host bridge dispatches on.
pub const SHARE_ACTION: &str = "share_result";

/// One label/value row of the result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub label: &'static str,
    pub value: String,
}

/// Result screen contents, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub title: &'static str,
    pub order_number: DisplayRow,
    pub package: DisplayRow,
    pub pile: DisplayRow,
    pub area: DisplayRow,
    pub extra: DisplayRow,
    /// Shown emphasized; always the last row.
    pub total: DisplayRow,
    pub footer: &'static str,
}

impl DisplayFields {
    pub fn rows(&self) -> [&DisplayRow; 6] {
        [
            &self.order_number,
            &self.package,
            &self.pile,
            &self.area,
            &self.extra,
            &self.total,
        ]
    }
}

/// Payload for the host bridge. Field names are part of the host contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub order_number: String,
    pub package: Package,
    pub pile: Pile,
    /// Area with exactly one decimal place, e.g. `"6.0"`.
    pub area: String,
    pub odor_removal: bool,
    pub total_price: i64,
}

/// Envelope written to the host bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEnvelope {
    pub action: String,
    pub result: SharePayload,
}

impl HostEnvelope {
    pub fn new(result: SharePayload) -> Self {
        Self {
            action: SHARE_ACTION.to_string(),
            result,
        }
    }

    /// Single-line JSON, as the host reads one message per line.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Area rounded to one decimal place, without unit.
pub fn area_text(result: &ComputedResult) -> String {
    round_area(result.area).to_string()
}

/// Total price rounded to a whole currency unit.
pub fn total_whole(result: &ComputedResult) -> i64 {
    round_whole(result.total_price)
}

fn order_text<'a>(
    state: &'a WizardState,
    labels: &'static Labels,
) -> &'a str {
    if state.order_number.is_empty() {
        labels.not_specified
    } else {
        &state.order_number
    }
}

fn extra_text(
    result: &ComputedResult,
    labels: &'static Labels,
) -> &'static str {
    if result.odor_removal {
        labels.odor_removal_yes
    } else {
        labels.add_on_none
    }
}

/// Builds the labelled rows of the result screen.
pub fn display_fields(
    result: &ComputedResult,
    state: &WizardState,
    labels: &'static Labels,
) -> DisplayFields {
    let row = |label: &'static str, value: String| DisplayRow { label, value };

    DisplayFields {
        title: labels.title,
        order_number: row(labels.order_label, order_text(state, labels).to_string()),
        package: row(labels.package_label, labels.package_name(result.package).to_string()),
        pile: row(labels.pile_label, labels.pile_name(result.pile).to_string()),
        area: row(
            labels.area_label,
            format!("{} {}", area_text(result), labels.area_unit),
        ),
        extra: row(labels.extra_label, extra_text(result, labels).to_string()),
        total: row(
            labels.total_label,
            format!("{} {}", total_whole(result), labels.currency),
        ),
        footer: labels.image_footer,
    }
}

/// Builds the plain-text summary used for copying and as a share fallback.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use rug_core::format::text_summary;
/// use rug_core::{Locale, Package, Pile, PricingTable, ResultComputer, WizardState};
///
/// let state = WizardState {
///     package: Some(Package::Standard),
///     pile: Some(Pile::Long),
///     length: Some(dec!(3)),
///     width: Some(dec!(2)),
///     ..WizardState::default()
/// };
/// let table = PricingTable::default();
/// let result = ResultComputer::new(&table).compute(&state).unwrap();
///
/// let text = text_summary(&result, &state, Locale::En.labels());
///
/// assert!(text.contains("Area: 6.0 m²"));
/// assert!(text.contains("Total cost: 66 rubles"));
/// ```
pub fn text_summary(
    result: &ComputedResult,
    state: &WizardState,
    labels: &'static Labels,
) -> String {
    let fields = display_fields(result, state, labels);
    let mut text = String::new();

    text.push_str(labels.summary_title);
    text.push_str("\n\n");
    for row in fields.rows() {
        text.push_str(row.label);
        text.push(' ');
        text.push_str(&row.value);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(labels.summary_footer);
    text
}

/// Builds the structured payload for the host bridge.
pub fn share_payload(
    result: &ComputedResult,
    state: &WizardState,
) -> SharePayload {
    SharePayload {
        order_number: state.order_number.clone(),
        package: result.package,
        pile: result.pile,
        area: area_text(result),
        odor_removal: result.odor_removal,
        total_price: total_whole(result),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Locale, PricingTable, ResultComputer};

    fn computed(
        package: Package,
        pile: Pile,
        length: Decimal,
        width: Decimal,
        odor_removal: bool,
        order_number: &str,
    ) -> (ComputedResult, WizardState) {
        let state = WizardState {
            package: Some(package),
            pile: Some(pile),
            length: Some(length),
            width: Some(width),
            odor_removal,
            order_number: order_number.to_string(),
        };
        let table = PricingTable::default();
        let result = ResultComputer::new(&table).compute(&state).unwrap();
        (result, state)
    }

    // =========================================================================
    // display_fields tests
    // =========================================================================

    #[test]
    fn display_fields_in_english() {
        let (result, state) =
            computed(Package::Standard, Pile::Long, dec!(3.0), dec!(2.0), false, "A-1");

        let fields = display_fields(&result, &state, Locale::En.labels());

        assert_eq!(fields.order_number.value, "A-1");
        assert_eq!(fields.package.value, "Standard");
        assert_eq!(fields.pile.value, "Long");
        assert_eq!(fields.area.value, "6.0 m²");
        assert_eq!(fields.extra.value, "No");
        assert_eq!(fields.total.value, "66 rubles");
    }

    #[test]
    fn display_fields_in_russian_with_add_on() {
        let (result, state) =
            computed(Package::Premium, Pile::Short, dec!(2.5), dec!(4.0), true, "");

        let fields = display_fields(&result, &state, Locale::Ru.labels());

        assert_eq!(fields.order_number.value, "Не указан");
        assert_eq!(fields.package.value, "Премиум");
        assert_eq!(fields.pile.value, "Короткий");
        assert_eq!(fields.area.value, "10.0 м²");
        assert_eq!(fields.extra.value, "Удаление запаха — да");
        assert_eq!(fields.total.value, "155 рублей");
    }

    #[test]
    fn display_rows_end_with_total() {
        let (result, state) =
            computed(Package::Standard, Pile::Short, dec!(1), dec!(1), false, "");

        let fields = display_fields(&result, &state, Locale::En.labels());
        let labels: Vec<_> = fields.rows().iter().map(|r| r.label).collect();

        assert_eq!(
            labels,
            vec![
                "Order number:",
                "Service package:",
                "Pile type:",
                "Area:",
                "Add-on:",
                "Total cost:"
            ]
        );
    }

    #[test]
    fn rounding_happens_only_at_presentation() {
        // 1.25 * 1.25 = 1.5625 m², * 15 = 23.4375; rounding the area first
        // would give 1.6 * 15 = 24.
        let (result, state) =
            computed(Package::Premium, Pile::Long, dec!(1.25), dec!(1.25), false, "");

        let fields = display_fields(&result, &state, Locale::En.labels());

        assert_eq!(fields.area.value, "1.6 m²");
        assert_eq!(fields.total.value, "23 rubles");
    }

    // =========================================================================
    // text_summary tests
    // =========================================================================

    #[test]
    fn text_summary_in_russian_matches_layout() {
        let (result, state) =
            computed(Package::Standard, Pile::Long, dec!(3.0), dec!(2.0), true, "777");

        let text = text_summary(&result, &state, Locale::Ru.labels());

        assert_eq!(
            text,
            "🧩 Расчёт стоимости чистки ковра\n\
             \n\
             Номер заказа: 777\n\
             Пакет услуг: Стандартный\n\
             Тип ворса: Длинный\n\
             Площадь: 6.0 м²\n\
             Доп.услуга: Удаление запаха — да\n\
             Итоговая стоимость: 91 рублей\n\
             \n\
             Рассчитано в Telegram Mini App \"Калькулятор ковров\""
        );
    }

    // =========================================================================
    // share_payload tests
    // =========================================================================

    #[test]
    fn share_payload_uses_stable_keys() {
        let (result, state) =
            computed(Package::Standard, Pile::Long, dec!(3.0), dec!(2.0), false, "");

        let envelope = HostEnvelope::new(share_payload(&result, &state));

        assert_eq!(
            envelope.to_json().unwrap(),
            r#"{"action":"share_result","result":{"orderNumber":"","package":"standard","pile":"long","area":"6.0","odorRemoval":false,"totalPrice":66}}"#
        );
    }

    #[test]
    fn summary_and_payload_agree_on_numbers() {
        let cases = [
            (dec!(1.23), dec!(4.56), true),
            (dec!(0.35), dec!(0.45), false),
            (dec!(49.99), dec!(50), true),
            (dec!(2.05), dec!(3.05), false),
        ];

        for (length, width, odor_removal) in cases {
            let (result, state) =
                computed(Package::Premium, Pile::Long, length, width, odor_removal, "");
            let labels = Locale::En.labels();

            let text = text_summary(&result, &state, labels);
            let payload = share_payload(&result, &state);

            assert!(
                text.contains(&format!("Area: {} m²", payload.area)),
                "area mismatch for {length} x {width}"
            );
            assert!(
                text.contains(&format!("Total cost: {} rubles", payload.total_price)),
                "total mismatch for {length} x {width}"
            );
        }
    }
}
