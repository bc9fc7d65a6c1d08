//! Wizard step machine.
//!
//! The wizard walks `main → package → pile → dimensions → extra → order →
//! result`. [`StepController::apply`] is a pure reducer: it takes the
//! current [`Wizard`] and an [`Action`] and returns the next wizard, or an
//! error that leaves the caller's wizard untouched.

mod controller;
mod step;

pub use controller::{Action, StepController, WizardError};
pub use step::{Step, Wizard};
