use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Step, Wizard};
use crate::calculations::{QuoteError, ResultComputer, validate_dimensions};
use crate::{Package, Pile, PricingTable};

/// Why an action did not move the wizard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    /// A guard rejected the transition; the user can correct the input.
    #[error(transparent)]
    Rejected(#[from] QuoteError),

    /// The action has no meaning on the current step.
    #[error("action '{action}' is not allowed on step '{step}'")]
    IllegalTransition {
        step: &'static str,
        action: &'static str,
    },
}

/// A single user action.
///
/// Selecting a package or pile both records the choice and advances; there
/// is no separate confirm action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    SelectPackage(Package),
    SelectPile(Pile),
    SetLength(Decimal),
    SetWidth(Decimal),
    SetOdorRemoval(bool),
    SetOrderNumber(String),
    Next,
    Calculate,
    Back,
    NewCalculation,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::SelectPackage(_) => "select_package",
            Self::SelectPile(_) => "select_pile",
            Self::SetLength(_) => "set_length",
            Self::SetWidth(_) => "set_width",
            Self::SetOdorRemoval(_) => "set_odor_removal",
            Self::SetOrderNumber(_) => "set_order_number",
            Self::Next => "next",
            Self::Calculate => "calculate",
            Self::Back => "back",
            Self::NewCalculation => "new_calculation",
        }
    }
}

/// Transition table of the wizard.
///
/// | From       | Action            | Guard                         | To         |
/// |------------|-------------------|-------------------------------|------------|
/// | main       | start             |                               | package    |
/// | package    | select package    |                               | pile       |
/// | pile       | select pile       |                               | dimensions |
/// | dimensions | next              | dimensions valid              | extra      |
/// | extra      | next              |                               | order      |
/// | order      | calculate         | selection + dimensions valid  | result     |
/// | package..order | back          |                               | previous   |
/// | any        | new calculation   |                               | main, reset|
///
/// Field edits (length, width, odor removal, order number) are accepted on
/// the step that owns the field and keep the wizard on that step.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use rug_core::{Action, Package, Pile, PricingTable, Step, StepController, Wizard};
///
/// let table = PricingTable::default();
/// let controller = StepController::new(&table);
///
/// let mut wizard = Wizard::new();
/// for action in [
///     Action::Start,
///     Action::SelectPackage(Package::Premium),
///     Action::SelectPile(Pile::Short),
///     Action::SetLength(dec!(2.5)),
///     Action::SetWidth(dec!(4.0)),
///     Action::Next,
///     Action::Next,
///     Action::Calculate,
/// ] {
///     wizard = controller.apply(&wizard, action).unwrap();
/// }
///
/// match wizard.step() {
///     Step::Result { result } => assert_eq!(result.total_price, dec!(130)),
///     other => panic!("unexpected step {other}"),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StepController<'a> {
    pricing: &'a PricingTable,
}

impl<'a> StepController<'a> {
    pub fn new(pricing: &'a PricingTable) -> Self {
        Self { pricing }
    }

    /// Applies `action` to `wizard` and returns the next wizard.
    ///
    /// The input is never modified, so on error the caller simply keeps
    /// its current wizard (entered values included).
    ///
    /// # Errors
    ///
    /// - [`WizardError::Rejected`] when a guard fails (dimensions, missing
    ///   selection).
    /// - [`WizardError::IllegalTransition`] when the action does not apply
    ///   to the current step.
    pub fn apply(
        &self,
        wizard: &Wizard,
        action: Action,
    ) -> Result<Wizard, WizardError> {
        let from = wizard.step().name();
        let action_name = action.name();

        match self.transition(wizard, action) {
            Ok(next) => {
                debug!(from, to = next.step().name(), action = action_name, "wizard transition");
                Ok(next)
            }
            Err(error) => {
                warn!(step = from, action = action_name, %error, "wizard action rejected");
                Err(error)
            }
        }
    }

    fn transition(
        &self,
        wizard: &Wizard,
        action: Action,
    ) -> Result<Wizard, WizardError> {
        let mut state = wizard.state().clone();

        let step = match (wizard.step(), action) {
            (_, Action::NewCalculation) => return Ok(Wizard::new()),

            // Forward
            (Step::Main, Action::Start) => Step::Package,
            (Step::Package, Action::SelectPackage(package)) => {
                state.package = Some(package);
                self.pile_step(package)
            }
            (Step::Pile { .. }, Action::SelectPile(pile)) => {
                state.pile = Some(pile);
                Step::Dimensions
            }
            (Step::Dimensions, Action::Next) => {
                validate_dimensions(state.length, state.width)?;
                Step::Extra
            }
            (Step::Extra, Action::Next) => Step::Order,
            (Step::Order, Action::Calculate) => {
                let result = ResultComputer::new(self.pricing).compute(&state)?;
                Step::Result { result }
            }

            // Field edits
            (Step::Dimensions, Action::SetLength(length)) => {
                state.length = Some(length);
                Step::Dimensions
            }
            (Step::Dimensions, Action::SetWidth(width)) => {
                state.width = Some(width);
                Step::Dimensions
            }
            (Step::Extra, Action::SetOdorRemoval(enabled)) => {
                state.odor_removal = enabled;
                Step::Extra
            }
            (Step::Order, Action::SetOrderNumber(order_number)) => {
                state.order_number = order_number;
                Step::Order
            }

            // Back
            (Step::Package, Action::Back) => Step::Main,
            (Step::Pile { .. }, Action::Back) => Step::Package,
            (Step::Dimensions, Action::Back) => {
                let package = state.package.ok_or(QuoteError::MissingSelection)?;
                self.pile_step(package)
            }
            (Step::Extra, Action::Back) => Step::Dimensions,
            (Step::Order, Action::Back) => Step::Extra,

            (step, action) => {
                return Err(WizardError::IllegalTransition {
                    step: step.name(),
                    action: action.name(),
                });
            }
        };

        Ok(Wizard::with_step(step, state))
    }

    /// Pile step with the rates of `package` looked up for display.
    fn pile_step(
        &self,
        package: Package,
    ) -> Step {
        Step::Pile {
            rates: self.pricing.pile_rates(package),
        }
    }
}
