pub mod calculations;
pub mod export;
pub mod format;
pub mod input;
pub mod labels;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod render;
pub mod wizard;

pub use calculations::{ComputedResult, QuoteError, ResultComputer};
pub use labels::{Labels, Locale};
pub use models::*;
pub use pricing::{PileRates, PricingError, PricingTable};
pub use wizard::{Action, Step, StepController, Wizard, WizardError};
