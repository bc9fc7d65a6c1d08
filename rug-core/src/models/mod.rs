mod service;
mod wizard_state;

pub use service::{Package, Pile};
pub use wizard_state::WizardState;
