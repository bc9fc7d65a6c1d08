use std::fmt;

use crate::calculations::ComputedResult;
use crate::pricing::PileRates;
use crate::WizardState;

/// The active wizard step.
///
/// Steps carry only what is needed to show them: the pile step carries the
/// rates of the chosen package, the result step carries the computed quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Main,
    Package,
    Pile { rates: PileRates },
    Dimensions,
    Extra,
    Order,
    Result { result: ComputedResult },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Package => "package",
            Self::Pile { .. } => "pile",
            Self::Dimensions => "dimensions",
            Self::Extra => "extra",
            Self::Order => "order",
            Self::Result { .. } => "result",
        }
    }

    /// 1-based position in the forward order.
    pub fn position(&self) -> usize {
        match self {
            Self::Main => 1,
            Self::Package => 2,
            Self::Pile { .. } => 3,
            Self::Dimensions => 4,
            Self::Extra => 5,
            Self::Order => 6,
            Self::Result { .. } => 7,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current step plus the selections collected so far.
///
/// Only [`super::StepController`] produces new values, so the step and the
/// state always agree (e.g. `Step::Result` is never paired with a state that
/// fails validation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    step: Step,
    state: WizardState,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::Main,
            state: WizardState::new(),
        }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub(super) fn with_step(
        step: Step,
        state: WizardState,
    ) -> Self {
        Self { step, state }
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}
