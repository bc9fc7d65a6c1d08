//! Contract for turning a formatted result into an image.
//!
//! The core only needs the boundary: formatted fields and a theme flag go
//! in, encoded image bytes come out. Drawing lives in a separate crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::DisplayFields;

/// Colour scheme reported by the host environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image encoding failed: {0}")]
    Encoding(String),

    #[error("card document rejected: {0}")]
    Document(String),

    #[error("invalid canvas size {width}x{height}")]
    Canvas { width: u32, height: u32 },
}

/// Renders result fields into an encoded image (PNG for the bundled renderer).
pub trait ResultRenderer: Send + Sync {
    /// MIME type of the bytes returned by [`ResultRenderer::render`].
    fn mime_type(&self) -> &'static str;

    fn render(
        &self,
        fields: &DisplayFields,
        theme: Theme,
    ) -> Result<Vec<u8>, RenderError>;
}
