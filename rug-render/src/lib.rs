//! PNG rendering of a rug cleaning quote.
//!
//! Implements [`rug_core::render::ResultRenderer`]: the card is laid out as
//! an SVG document and rasterized with `resvg`. DejaVu Sans is embedded, so
//! no system fonts are needed at runtime.

pub mod card;

pub use card::{CARD_HEIGHT, CARD_WIDTH, Palette, PngResultRenderer, Rgb};
