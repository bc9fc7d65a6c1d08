//! Ordered fallback chain for handing a result to the outside world.
//!
//! An [`ExportChain`] is a list of [`ExportStrategy`] values tried in
//! order. The first success ends the run; each failure is logged and the
//! next, simpler strategy is tried. If every strategy fails the run ends
//! with [`ExportError::Exhausted`]. Strategies only read the bundle, so a
//! run can be repeated without side effects beyond repeating the output.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use rug_core::export::{ExportBundle, ExportChain, ExportError, ExportOutcome, ExportStrategy};
//!
//! struct NoBridge;
//!
//! #[async_trait]
//! impl ExportStrategy for NoBridge {
//!     fn name(&self) -> &'static str { "host_bridge" }
//!     async fn export(&self, _: &ExportBundle) -> Result<ExportOutcome, ExportError> {
//!         Err(ExportError::Unavailable { strategy: self.name() })
//!     }
//! }
//!
//! struct Manual;
//!
//! #[async_trait]
//! impl ExportStrategy for Manual {
//!     fn name(&self) -> &'static str { "manual" }
//!     async fn export(&self, _: &ExportBundle) -> Result<ExportOutcome, ExportError> {
//!         Ok(ExportOutcome::ManualCopy)
//!     }
//! }
//!
//! let chain = ExportChain::new().with(NoBridge).with(Manual);
//! assert_eq!(chain.strategy_names(), vec!["host_bridge", "manual"]);
//! ```

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::ComputedResult;
use crate::format::{DisplayFields, SharePayload, display_fields, share_payload, text_summary};
use crate::notify::{Notification, Notifier};
use crate::render::{ResultRenderer, Theme};
use crate::{Labels, WizardState};

/// Why a strategy could not deliver the result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// The mechanism does not exist in this environment.
    #[error("{strategy} is not available")]
    Unavailable { strategy: &'static str },

    /// The strategy needs the rendered image and rendering failed.
    #[error("{strategy} needs an image but none was rendered")]
    ImageUnavailable { strategy: &'static str },

    /// The mechanism exists but the hand-off failed.
    #[error("{strategy} failed: {reason}")]
    Failed {
        strategy: &'static str,
        reason: String,
    },

    /// Every strategy in the chain failed.
    #[error("all {count} export strategies failed", count = .failures.len())]
    Exhausted { failures: Vec<ExportError> },
}

/// What a successful strategy did, used to pick the confirmation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    SentToHost,
    Shared,
    CopiedImage,
    CopiedText,
    ManualCopy,
}

impl ExportOutcome {
    pub fn message(
        &self,
        labels: &'static Labels,
    ) -> &'static str {
        match self {
            Self::SentToHost => labels.sent_to_host,
            Self::Shared => labels.shared,
            Self::CopiedImage => labels.copied_image,
            Self::CopiedText => labels.copied_text,
            Self::ManualCopy => labels.manual_copy,
        }
    }

    /// Confirmation for the user. Falling back to manual selection means
    /// nothing was delivered, so it is reported as an error.
    pub fn notification(
        &self,
        labels: &'static Labels,
    ) -> Notification {
        match self {
            Self::ManualCopy => Notification::error(self.message(labels)),
            _ => Notification::info(self.message(labels)),
        }
    }
}

/// Rendered image attached to a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportImage {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Every representation of one result, prepared once per export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub fields: DisplayFields,
    pub text: String,
    pub payload: SharePayload,
    /// `None` when no renderer is configured or rendering failed.
    pub image: Option<ExportImage>,
    /// A renderer was configured but produced no image.
    pub image_failed: bool,
}

impl ExportBundle {
    /// Formats the result and renders the image.
    ///
    /// A render failure is logged, sets `image_failed` and leaves `image`
    /// empty; strategies that need the image then fall through to
    /// text-based ones.
    pub fn prepare(
        result: &ComputedResult,
        state: &WizardState,
        labels: &'static Labels,
        renderer: Option<&dyn ResultRenderer>,
        theme: Theme,
    ) -> Self {
        let fields = display_fields(result, state, labels);
        let image = renderer.and_then(|renderer| match renderer.render(&fields, theme) {
            Ok(bytes) => Some(ExportImage {
                mime_type: renderer.mime_type(),
                bytes,
            }),
            Err(error) => {
                warn!(%error, "result image rendering failed");
                None
            }
        });

        Self {
            text: text_summary(result, state, labels),
            payload: share_payload(result, state),
            fields,
            image_failed: renderer.is_some() && image.is_none(),
            image,
        }
    }

    /// The image, or [`ExportError::ImageUnavailable`] on behalf of `strategy`.
    pub fn require_image(
        &self,
        strategy: &'static str,
    ) -> Result<&ExportImage, ExportError> {
        self.image
            .as_ref()
            .ok_or(ExportError::ImageUnavailable { strategy })
    }
}

/// One way of delivering a result.
#[async_trait]
pub trait ExportStrategy: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    async fn export(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportOutcome, ExportError>;
}

/// Successful chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub strategy: &'static str,
    pub outcome: ExportOutcome,
    /// Failures of the strategies tried before the successful one.
    pub fallbacks: Vec<ExportError>,
}

/// Strategies tried in order until one succeeds.
#[derive(Default)]
pub struct ExportChain {
    strategies: Vec<Box<dyn ExportStrategy>>,
}

impl ExportChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy to the end of the chain.
    pub fn with(
        mut self,
        strategy: impl ExportStrategy + 'static,
    ) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Tries each strategy in order and stops at the first success.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Exhausted`] with every individual failure when
    /// no strategy succeeds (including when the chain is empty).
    pub async fn run(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportReport, ExportError> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.export(bundle).await {
                Ok(outcome) => {
                    info!(strategy = strategy.name(), ?outcome, "result exported");
                    return Ok(ExportReport {
                        strategy: strategy.name(),
                        outcome,
                        fallbacks: failures,
                    });
                }
                Err(error) => {
                    warn!(strategy = strategy.name(), %error, "export strategy failed, trying next");
                    failures.push(error);
                }
            }
        }

        Err(ExportError::Exhausted { failures })
    }

    /// Runs the chain and reports the final outcome through `notifier`.
    ///
    /// Exactly one outcome notification is emitted: the confirmation of the
    /// strategy that succeeded, or the exhaustion message. It is preceded by
    /// an info notice when the bundle's image could not be rendered.
    pub async fn run_and_notify(
        &self,
        bundle: &ExportBundle,
        labels: &'static Labels,
        notifier: &dyn Notifier,
    ) -> Result<ExportReport, ExportError> {
        if bundle.image_failed {
            notifier.notify(Notification::info(labels.image_failed));
        }
        let report = self.run(bundle).await;
        match &report {
            Ok(report) => notifier.notify(report.outcome.notification(labels)),
            Err(error) => {
                warn!(%error, "no export strategy succeeded");
                notifier.notify(Notification::error(labels.export_exhausted));
            }
        }
        report
    }
}
