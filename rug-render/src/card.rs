//! Result card layout and PNG encoding.
//!
//! The card is an SVG document in card coordinates, rasterized by `resvg`
//! and scaled to the requested pixel density.
//!
//! | Element | Position (at scale 1)                 | Font        |
//! |---------|---------------------------------------|-------------|
//! | Border  | 2px frame inset 10px                  |             |
//! | Title   | centered, baseline 48                 | 24px bold   |
//! | Rows    | label x = 30, value x = 300           | 16px        |
//! | Total   | last row, accent colour               | 22px bold   |
//! | Footer  | centered, baseline 336                | 13px        |
//!
//! Row baselines start at 100 and are 40px apart, with a 1px divider 12px
//! below every row but the last.

use std::fmt;
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use rug_core::format::DisplayFields;
use rug_core::render::{RenderError, ResultRenderer, Theme};
use tracing::debug;

pub const CARD_WIDTH: u32 = 640;
pub const CARD_HEIGHT: u32 = 360;

const MAX_SCALE: u32 = 4;

const FONT_FAMILY: &str = "DejaVu Sans";
const FONT_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const FONT_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

const MARGIN: u32 = 10;
const BORDER: u32 = 2;
const TITLE_BASELINE: u32 = 48;
const FIRST_ROW_BASELINE: u32 = 100;
const ROW_STEP: u32 = 40;
const LABEL_X: u32 = 30;
const VALUE_X: u32 = 300;
const DIVIDER_OFFSET: u32 = 12;
const FOOTER_BASELINE: u32 = CARD_HEIGHT - 24;

const TITLE_SIZE: u32 = 24;
const ROW_SIZE: u32 = 16;
const TOTAL_SIZE: u32 = 22;
const FOOTER_SIZE: u32 = 13;

/// Opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colours of one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
    pub border: Rgb,
    pub accent: Rgb,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Rgb(0xff, 0xff, 0xff),
        text: Rgb(0x00, 0x00, 0x00),
        border: Rgb(0xe9, 0xec, 0xef),
        accent: Rgb(0x00, 0x88, 0xcc),
    };

    pub const DARK: Palette = Palette {
        background: Rgb(0x2d, 0x2d, 0x2d),
        text: Rgb(0xff, 0xff, 0xff),
        border: Rgb(0x40, 0x40, 0x40),
        accent: Rgb(0x00, 0x88, 0xcc),
    };

    pub fn for_theme(theme: Theme) -> Self {
        if theme.is_dark() { Self::DARK } else { Self::LIGHT }
    }
}

/// Draws the result card and encodes it as PNG.
///
/// `scale` multiplies every coordinate; scale 2 produces a 1280×720 card
/// for high-density displays. The font database is built once and shared
/// by clones.
#[derive(Clone)]
pub struct PngResultRenderer {
    scale: u32,
    fonts: Arc<fontdb::Database>,
}

impl fmt::Debug for PngResultRenderer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("PngResultRenderer")
            .field("scale", &self.scale)
            .field("faces", &self.fonts.len())
            .finish()
    }
}

impl Default for PngResultRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PngResultRenderer {
    pub fn new() -> Self {
        Self::with_scale(1)
    }

    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale,
            fonts: Arc::new(embedded_fonts()),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Rasterizes the card without encoding it.
    pub fn draw(
        &self,
        fields: &DisplayFields,
        theme: Theme,
    ) -> Result<Pixmap, RenderError> {
        let width = CARD_WIDTH.saturating_mul(self.scale);
        let height = CARD_HEIGHT.saturating_mul(self.scale);
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(RenderError::Canvas { width, height });
        }

        let document = card_svg(fields, Palette::for_theme(theme));
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fonts);
        let tree = usvg::Tree::from_str(&document, &options)
            .map_err(|e| RenderError::Document(e.to_string()))?;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        let scale = self.scale as f32;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl ResultRenderer for PngResultRenderer {
    fn mime_type(&self) -> &'static str {
        "image/png"
    }

    fn render(
        &self,
        fields: &DisplayFields,
        theme: Theme,
    ) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.draw(fields, theme)?;
        let buf = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encoding(e.to_string()))?;

        debug!(
            width = pixmap.width(),
            height = pixmap.height(),
            bytes = buf.len(),
            ?theme,
            "rendered result card"
        );
        Ok(buf)
    }
}

fn embedded_fonts() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_font_data(FONT_REGULAR.to_vec());
    db.load_font_data(FONT_BOLD.to_vec());
    db.set_sans_serif_family(FONT_FAMILY);
    db
}

/// Lays the card out as an SVG document in unscaled card coordinates.
fn card_svg(
    fields: &DisplayFields,
    palette: Palette,
) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" font-family="{FONT_FAMILY}">"#
    );
    svg.push_str(&rect(0, 0, CARD_WIDTH, CARD_HEIGHT, palette.background));

    let inner_w = CARD_WIDTH - 2 * MARGIN;
    let inner_h = CARD_HEIGHT - 2 * MARGIN;
    svg.push_str(&rect(MARGIN, MARGIN, inner_w, BORDER, palette.border));
    svg.push_str(&rect(MARGIN, CARD_HEIGHT - MARGIN - BORDER, inner_w, BORDER, palette.border));
    svg.push_str(&rect(MARGIN, MARGIN, BORDER, inner_h, palette.border));
    svg.push_str(&rect(CARD_WIDTH - MARGIN - BORDER, MARGIN, BORDER, inner_h, palette.border));

    svg.push_str(&text(
        fields.title,
        TextStyle::centered(TITLE_BASELINE, TITLE_SIZE, palette.text).bold(),
    ));

    let rows = fields.rows();
    let last = rows.len() - 1;
    for (i, row) in rows.iter().enumerate() {
        let baseline = FIRST_ROW_BASELINE + i as u32 * ROW_STEP;
        svg.push_str(&text(row.label, TextStyle::at(LABEL_X, baseline, ROW_SIZE, palette.text)));

        if i == last {
            svg.push_str(&text(
                &row.value,
                TextStyle::at(VALUE_X, baseline, TOTAL_SIZE, palette.accent).bold(),
            ));
        } else {
            svg.push_str(&text(&row.value, TextStyle::at(VALUE_X, baseline, ROW_SIZE, palette.text)));
            svg.push_str(&rect(
                LABEL_X,
                baseline + DIVIDER_OFFSET,
                CARD_WIDTH - 2 * LABEL_X,
                1,
                palette.border,
            ));
        }
    }

    svg.push_str(&text(
        fields.footer,
        TextStyle::centered(FOOTER_BASELINE, FOOTER_SIZE, palette.text),
    ));
    svg.push_str("</svg>");
    svg
}

fn rect(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb,
) -> String {
    format!(
        r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"/>"#,
        color.hex()
    )
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    x: u32,
    baseline: u32,
    size: u32,
    color: Rgb,
    centered: bool,
    bold: bool,
}

impl TextStyle {
    fn at(
        x: u32,
        baseline: u32,
        size: u32,
        color: Rgb,
    ) -> Self {
        Self {
            x,
            baseline,
            size,
            color,
            centered: false,
            bold: false,
        }
    }

    fn centered(
        baseline: u32,
        size: u32,
        color: Rgb,
    ) -> Self {
        Self {
            centered: true,
            ..Self::at(CARD_WIDTH / 2, baseline, size, color)
        }
    }

    fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

fn text(
    content: &str,
    style: TextStyle,
) -> String {
    let anchor = if style.centered { "middle" } else { "start" };
    let weight = if style.bold { "bold" } else { "normal" };
    format!(
        r#"<text x="{}" y="{}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}" fill="{}" xml:space="preserve">{}</text>"#,
        style.x,
        style.baseline,
        style.size,
        style.color.hex(),
        escape(content),
    )
}

/// Escapes markup characters. Control characters are not allowed in XML
/// and become spaces.
fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}
