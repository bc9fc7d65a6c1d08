//! One-shot quote: the wizard driven by a fixed list of actions.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rug_core::export::ExportBundle;
use rug_core::format::{share_payload, text_summary};
use rug_core::notify::Notification;
use rug_core::{
    Action, ComputedResult, Package, Pile, PricingTable, Step, StepController, Wizard, WizardError,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::shell::{ExportKind, ShellContext};

/// Selections for a single quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub package: Package,
    pub pile: Pile,
    pub length: Decimal,
    pub width: Decimal,
    pub odor_removal: bool,
    pub order_number: String,
}

impl QuoteRequest {
    /// The actions a user would take in the interactive wizard.
    pub fn actions(&self) -> Vec<Action> {
        vec![
            Action::Start,
            Action::SelectPackage(self.package),
            Action::SelectPile(self.pile),
            Action::SetLength(self.length),
            Action::SetWidth(self.width),
            Action::Next,
            Action::SetOdorRemoval(self.odor_removal),
            Action::Next,
            Action::SetOrderNumber(self.order_number.clone()),
            Action::Calculate,
        ]
    }
}

/// What to do with the computed quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteOptions {
    /// Print the host payload as JSON instead of the text summary.
    pub json: bool,
    /// Also write the rendered card to this file.
    pub png: Option<PathBuf>,
    pub export: Option<ExportKind>,
}

/// Runs `request` through the controller.
///
/// # Errors
///
/// The first rejected action, e.g. [`WizardError::Rejected`] for invalid
/// dimensions.
pub fn compute_quote(
    pricing: &PricingTable,
    request: &QuoteRequest,
) -> Result<(Wizard, ComputedResult), WizardError> {
    let controller = StepController::new(pricing);
    let wizard = request
        .actions()
        .into_iter()
        .try_fold(Wizard::new(), |wizard, action| controller.apply(&wizard, action))?;

    let result = match wizard.step() {
        Step::Result { result } => result.clone(),
        other => {
            return Err(WizardError::IllegalTransition {
                step: other.name(),
                action: Action::Calculate.name(),
            });
        }
    };
    Ok((wizard, result))
}

/// Computes the quote, prints it and performs the requested outputs.
pub async fn run_quote(
    ctx: &ShellContext,
    request: &QuoteRequest,
    options: &QuoteOptions,
) -> Result<()> {
    let labels = ctx.labels();

    let (wizard, result) = match compute_quote(&ctx.pricing, request) {
        Ok(computed) => computed,
        Err(error) => {
            ctx.notifier
                .notify(Notification::error(labels.wizard_error(&error)));
            return Err(error).context("quote rejected");
        }
    };
    let state = wizard.state();
    info!(total = %result.total_price, "quote calculated");

    if options.json {
        let payload = serde_json::to_string_pretty(&share_payload(&result, state))
            .context("serializing quote")?;
        ctx.console.line(&payload);
    } else {
        ctx.console.line(&text_summary(&result, state, labels));
    }

    let needs_image = options.png.is_some() || options.export == Some(ExportKind::Share);
    let renderer = if needs_image { ctx.renderer.as_deref() } else { None };
    let bundle = ExportBundle::prepare(&result, state, labels, renderer, ctx.theme);

    if let Some(path) = &options.png {
        let Some(image) = &bundle.image else {
            bail!("no result image could be rendered");
        };
        tokio::fs::write(path, &image.bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "result image written");
    }

    if let Some(kind) = options.export {
        ctx.chain(kind)
            .run_and_notify(&bundle, labels, ctx.notifier.as_ref())
            .await
            .context("export failed")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rug_core::QuoteError;
    use rust_decimal_macros::dec;

    use super::*;

    fn request(
        length: Decimal,
        width: Decimal,
    ) -> QuoteRequest {
        QuoteRequest {
            package: Package::Premium,
            pile: Pile::Long,
            length,
            width,
            odor_removal: true,
            order_number: "15".to_string(),
        }
    }

    #[test]
    fn compute_quote_reaches_result() {
        let table = PricingTable::default();

        let (wizard, result) = compute_quote(&table, &request(dec!(3), dec!(2))).unwrap();

        assert_eq!(result.total_price, dec!(115));
        assert_eq!(wizard.state().order_number, "15");
    }

    #[test]
    fn compute_quote_rejects_invalid_dimensions() {
        let table = PricingTable::default();

        let err = compute_quote(&table, &request(dec!(0), dec!(2))).unwrap_err();

        assert_eq!(err, WizardError::Rejected(QuoteError::InvalidDimensions));
    }

    #[test]
    fn compute_quote_rejects_oversized_rug() {
        let table = PricingTable::default();

        let err = compute_quote(&table, &request(dec!(51), dec!(2))).unwrap_err();

        assert!(matches!(
            err,
            WizardError::Rejected(QuoteError::DimensionsTooLarge { .. })
        ));
    }
}
