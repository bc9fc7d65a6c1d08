//! User-facing text in the two supported languages.
//!
//! Every string the wizard shows (prompts, display names, result labels,
//! notifications) comes from one static [`Labels`] table per [`Locale`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::QuoteError;
use crate::wizard::WizardError;
use crate::{Package, Pile};

/// Language of the labels. Input is never localized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ru,
}

impl Locale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::Ru => &RU,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Ru => f.write_str("ru"),
        }
    }
}

/// Static text table for one locale.
#[derive(Debug)]
pub struct Labels {
    // Steps
    pub welcome: &'static str,
    pub start_hint: &'static str,
    pub package_prompt: &'static str,
    pub pile_prompt: &'static str,
    pub dimensions_prompt: &'static str,
    pub extra_prompt: &'static str,
    pub order_prompt: &'static str,
    pub result_hint: &'static str,
    pub back_hint: &'static str,

    // Display names
    pub package_standard: &'static str,
    pub package_premium: &'static str,
    pub pile_short: &'static str,
    pub pile_long: &'static str,

    // Result fields
    pub title: &'static str,
    pub summary_title: &'static str,
    pub order_label: &'static str,
    pub package_label: &'static str,
    pub pile_label: &'static str,
    pub area_label: &'static str,
    pub extra_label: &'static str,
    pub total_label: &'static str,
    pub not_specified: &'static str,
    pub odor_removal_yes: &'static str,
    pub add_on_none: &'static str,
    pub area_unit: &'static str,
    pub currency: &'static str,
    pub rate_unit: &'static str,
    pub image_footer: &'static str,
    pub summary_footer: &'static str,

    // Notifications
    pub error_invalid_dimensions: &'static str,
    pub error_dimensions_too_large: &'static str,
    pub error_missing_selection: &'static str,
    pub error_price_overflow: &'static str,
    pub error_illegal_action: &'static str,
    pub unknown_choice: &'static str,
    pub sent_to_host: &'static str,
    pub shared: &'static str,
    pub copied_text: &'static str,
    pub copied_image: &'static str,
    pub image_failed: &'static str,
    pub manual_copy: &'static str,
    pub export_exhausted: &'static str,
}

impl Labels {
    pub fn package_name(
        &self,
        package: Package,
    ) -> &'static str {
        match package {
            Package::Standard => self.package_standard,
            Package::Premium => self.package_premium,
        }
    }

    pub fn pile_name(
        &self,
        pile: Pile,
    ) -> &'static str {
        match pile {
            Pile::Short => self.pile_short,
            Pile::Long => self.pile_long,
        }
    }

    /// Text of the error notification for a rejected wizard action.
    pub fn wizard_error(
        &self,
        error: &WizardError,
    ) -> &'static str {
        match error {
            WizardError::Rejected(quote) => self.quote_error(quote),
            WizardError::IllegalTransition { .. } => self.error_illegal_action,
        }
    }

    pub fn quote_error(
        &self,
        error: &QuoteError,
    ) -> &'static str {
        match error {
            QuoteError::MissingSelection => self.error_missing_selection,
            QuoteError::InvalidDimensions => self.error_invalid_dimensions,
            QuoteError::DimensionsTooLarge { .. } => self.error_dimensions_too_large,
            QuoteError::PriceOverflow => self.error_price_overflow,
        }
    }
}

static EN: Labels = Labels {
    welcome: "Rug cleaning calculator",
    start_hint: "Press Enter to start a new calculation.",
    package_prompt: "Choose a service package",
    pile_prompt: "Choose the pile type",
    dimensions_prompt: "Enter rug length and width in meters (e.g. 3 2.5)",
    extra_prompt: "Add odor removal? (y/n)",
    order_prompt: "Order number (optional)",
    result_hint: "Commands: share, copy, new, quit",
    back_hint: "Type 'back' to return to the previous step.",

    package_standard: "Standard",
    package_premium: "Premium",
    pile_short: "Short",
    pile_long: "Long",

    title: "🧩 Calculation result",
    summary_title: "🧩 Rug cleaning cost estimate",
    order_label: "Order number:",
    package_label: "Service package:",
    pile_label: "Pile type:",
    area_label: "Area:",
    extra_label: "Add-on:",
    total_label: "Total cost:",
    not_specified: "Not specified",
    odor_removal_yes: "Odor removal — yes",
    add_on_none: "No",
    area_unit: "m²",
    currency: "rubles",
    rate_unit: "rub/m²",
    image_footer: "Rug calculator - Telegram Mini App",
    summary_footer: "Calculated in the \"Rug calculator\" Telegram Mini App",

    error_invalid_dimensions: "Please enter valid rug dimensions",
    error_dimensions_too_large: "Rug dimensions cannot exceed 50 meters",
    error_missing_selection: "Please choose a service package and a pile type",
    error_price_overflow: "The price is too large to calculate",
    error_illegal_action: "That action is not available on this step",
    unknown_choice: "Input not recognized, please try again",
    sent_to_host: "The result was sent to the bot! Check the chat.",
    shared: "Result shared!",
    copied_text: "Result copied to the clipboard!",
    copied_image: "Result image copied to the clipboard!",
    image_failed: "Could not create the result image, sending text instead.",
    manual_copy: "Could not copy the result. Please select the text manually.",
    export_exhausted: "Could not share the result. Please select the text manually.",
};

static RU: Labels = Labels {
    welcome: "Калькулятор ковров",
    start_hint: "Нажмите Enter, чтобы начать расчёт.",
    package_prompt: "Выберите пакет услуг",
    pile_prompt: "Выберите тип ворса",
    dimensions_prompt: "Введите длину и ширину ковра в метрах (например, 3 2,5)",
    extra_prompt: "Добавить удаление запаха? (да/нет)",
    order_prompt: "Номер заказа (необязательно)",
    result_hint: "Команды: share, copy, new, quit",
    back_hint: "Введите 'back', чтобы вернуться назад.",

    package_standard: "Стандартный",
    package_premium: "Премиум",
    pile_short: "Короткий",
    pile_long: "Длинный",

    title: "🧩 Результат расчёта",
    summary_title: "🧩 Расчёт стоимости чистки ковра",
    order_label: "Номер заказа:",
    package_label: "Пакет услуг:",
    pile_label: "Тип ворса:",
    area_label: "Площадь:",
    extra_label: "Доп.услуга:",
    total_label: "Итоговая стоимость:",
    not_specified: "Не указан",
    odor_removal_yes: "Удаление запаха — да",
    add_on_none: "Нет",
    area_unit: "м²",
    currency: "рублей",
    rate_unit: "руб/м²",
    image_footer: "Калькулятор ковров - Telegram Mini App",
    summary_footer: "Рассчитано в Telegram Mini App \"Калькулятор ковров\"",

    error_invalid_dimensions: "Пожалуйста, введите корректные размеры ковра",
    error_dimensions_too_large: "Размеры ковра не могут превышать 50 метров",
    error_missing_selection: "Пожалуйста, выберите пакет услуг и тип ворса",
    error_price_overflow: "Стоимость слишком велика для расчёта",
    error_illegal_action: "Это действие недоступно на текущем шаге",
    unknown_choice: "Ввод не распознан, попробуйте ещё раз",
    sent_to_host: "Изображение результата отправлено боту! Проверьте чат.",
    shared: "Результат поделен!",
    copied_text: "Результат скопирован в буфер обмена!",
    copied_image: "Изображение результата скопировано в буфер обмена!",
    image_failed: "Ошибка создания изображения. Отправляем результат текстом.",
    manual_copy: "Не удалось скопировать результат. Попробуйте выделить текст вручную.",
    export_exhausted: "Ошибка при копировании. Попробуйте выделить текст вручную.",
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn locale_parse_accepts_known_codes() {
        assert_eq!(Locale::parse("EN"), Some(Locale::En));
        assert_eq!(Locale::parse("ru"), Some(Locale::Ru));
        assert_eq!(Locale::parse("de"), None);
    }

    #[test]
    fn display_names_follow_locale() {
        assert_eq!(Locale::En.labels().package_name(Package::Premium), "Premium");
        assert_eq!(Locale::Ru.labels().pile_name(Pile::Long), "Длинный");
    }

    #[test]
    fn quote_errors_map_to_distinct_messages() {
        let labels = Locale::En.labels();

        assert_eq!(
            labels.quote_error(&QuoteError::InvalidDimensions),
            "Please enter valid rug dimensions"
        );
        assert_eq!(
            labels.quote_error(&QuoteError::DimensionsTooLarge { max: dec!(50) }),
            "Rug dimensions cannot exceed 50 meters"
        );
        assert_eq!(
            labels.wizard_error(&WizardError::Rejected(QuoteError::MissingSelection)),
            "Please choose a service package and a pile type"
        );
    }
}
