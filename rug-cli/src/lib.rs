pub mod app;
pub mod config;
pub mod exporters;
pub mod logging;
pub mod notify;
pub mod quote;
pub mod shell;

pub use app::build_context;
pub use config::{AppConfig, ConfigError, Overrides};
pub use notify::{Console, TerminalNotifier};
pub use quote::{QuoteOptions, QuoteRequest, compute_quote, run_quote};
pub use shell::{ExportKind, Flow, Session, ShellContext};
