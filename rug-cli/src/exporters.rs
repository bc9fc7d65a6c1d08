//! Concrete export strategies and the two chains built from them.
//!
//! | Strategy          | Needs image | Outcome        |
//! |-------------------|-------------|----------------|
//! | `host-bridge`     | no          | `SentToHost`   |
//! | `os-share`        | yes         | `Shared`       |
//! | `clipboard-image` | yes         | `CopiedImage`  |
//! | `clipboard-text`  | no          | `CopiedText`   |
//! | `manual`          | no          | `ManualCopy`   |
//!
//! The share chain tries them top to bottom; the copy chain only uses the
//! last two.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use arboard::{Clipboard, ImageData};
use async_trait::async_trait;
use rug_core::export::{ExportBundle, ExportChain, ExportError, ExportOutcome, ExportStrategy};
use rug_core::format::HostEnvelope;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::AppConfig;
use crate::notify::Console;

/// File written for the OS share handler.
pub const SHARE_FILE_NAME: &str = "result.png";

fn failed(
    strategy: &'static str,
    reason: impl ToString,
) -> ExportError {
    ExportError::Failed {
        strategy,
        reason: reason.to_string(),
    }
}

/// Appends the result envelope as one JSON line to the host channel.
pub struct HostBridge {
    channel: Option<PathBuf>,
}

impl HostBridge {
    pub fn new(channel: Option<PathBuf>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ExportStrategy for HostBridge {
    fn name(&self) -> &'static str {
        "host-bridge"
    }

    async fn export(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportOutcome, ExportError> {
        let Some(channel) = &self.channel else {
            return Err(ExportError::Unavailable {
                strategy: self.name(),
            });
        };

        let mut line = HostEnvelope::new(bundle.payload.clone())
            .to_json()
            .map_err(|e| failed(self.name(), e))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(channel)
            .await
            .map_err(|e| failed(self.name(), e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| failed(self.name(), e))?;
        file.flush().await.map_err(|e| failed(self.name(), e))?;

        debug!(channel = %channel.display(), "result sent to host");
        Ok(ExportOutcome::SentToHost)
    }
}

/// Opens a file with the desktop's default handler.
pub type Opener = fn(&Path) -> io::Result<()>;

fn open_with_system(path: &Path) -> io::Result<()> {
    open::that(path)
}

/// Saves the image and hands it to the OS default handler.
pub struct ShareSheet {
    dir: PathBuf,
    opener: Opener,
}

impl ShareSheet {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            opener: open_with_system,
        }
    }

    pub fn with_opener(
        mut self,
        opener: Opener,
    ) -> Self {
        self.opener = opener;
        self
    }
}

#[async_trait]
impl ExportStrategy for ShareSheet {
    fn name(&self) -> &'static str {
        "os-share"
    }

    async fn export(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportOutcome, ExportError> {
        let image = bundle.require_image(self.name())?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| failed(self.name(), e))?;
        let path = self.dir.join(SHARE_FILE_NAME);
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| failed(self.name(), e))?;

        let opener = self.opener;
        let opened = path.clone();
        tokio::task::spawn_blocking(move || opener(&opened))
            .await
            .map_err(|e| failed(self.name(), e))?
            .map_err(|e| failed(self.name(), e))?;

        debug!(path = %path.display(), "result handed to the OS share handler");
        Ok(ExportOutcome::Shared)
    }
}

/// Puts the rendered image on the system clipboard.
pub struct ClipboardImage;

#[async_trait]
impl ExportStrategy for ClipboardImage {
    fn name(&self) -> &'static str {
        "clipboard-image"
    }

    async fn export(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportOutcome, ExportError> {
        let name = self.name();
        let image = bundle.require_image(name)?;

        let decoded = image::load_from_memory(&image.bytes)
            .map_err(|e| failed(name, e))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        let data = ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(decoded.into_raw()),
        };

        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                Clipboard::new().map_err(|_| ExportError::Unavailable { strategy: name })?;
            clipboard.set_image(data).map_err(|e| failed(name, e))
        })
        .await
        .map_err(|e| failed(name, e))??;

        Ok(ExportOutcome::CopiedImage)
    }
}

/// Puts the plain-text summary on the system clipboard.
pub struct ClipboardText;

#[async_trait]
impl ExportStrategy for ClipboardText {
    fn name(&self) -> &'static str {
        "clipboard-text"
    }

    async fn export(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportOutcome, ExportError> {
        let name = self.name();
        let text = bundle.text.clone();

        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                Clipboard::new().map_err(|_| ExportError::Unavailable { strategy: name })?;
            clipboard.set_text(text).map_err(|e| failed(name, e))
        })
        .await
        .map_err(|e| failed(name, e))??;

        Ok(ExportOutcome::CopiedText)
    }
}

/// Last resort: prints the summary so the user can select it.
pub struct ManualInstructions {
    console: Console,
}

impl ManualInstructions {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

#[async_trait]
impl ExportStrategy for ManualInstructions {
    fn name(&self) -> &'static str {
        "manual"
    }

    async fn export(
        &self,
        bundle: &ExportBundle,
    ) -> Result<ExportOutcome, ExportError> {
        self.console.blank();
        self.console.line(&bundle.text);
        self.console.blank();
        Ok(ExportOutcome::ManualCopy)
    }
}

/// Environment-specific inputs of the strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub bridge: Option<PathBuf>,
    pub share_dir: PathBuf,
}

impl ExportSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            bridge: config.bridge.clone(),
            share_dir: std::env::temp_dir().join("rug-calc"),
        }
    }
}

/// Host bridge, OS share, clipboard image, clipboard text, manual.
pub fn share_chain(
    settings: &ExportSettings,
    console: &Console,
) -> ExportChain {
    ExportChain::new()
        .with(HostBridge::new(settings.bridge.clone()))
        .with(ShareSheet::new(settings.share_dir.clone()))
        .with(ClipboardImage)
        .with(ClipboardText)
        .with(ManualInstructions::new(console.clone()))
}

/// Clipboard text, manual.
pub fn copy_chain(console: &Console) -> ExportChain {
    ExportChain::new()
        .with(ClipboardText)
        .with(ManualInstructions::new(console.clone()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rug_core::export::ExportImage;
    use rug_core::render::Theme;
    use rug_core::{Locale, Package, Pile, PricingTable, ResultComputer, WizardState};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::notify::testing::SharedBuffer;

    fn bundle(with_image: bool) -> ExportBundle {
        let state = WizardState {
            package: Some(Package::Standard),
            pile: Some(Pile::Long),
            length: Some(dec!(3)),
            width: Some(dec!(2)),
            odor_removal: false,
            order_number: "42".to_string(),
        };
        let table = PricingTable::default();
        let result = ResultComputer::new(&table).compute(&state).unwrap();
        let mut bundle =
            ExportBundle::prepare(&result, &state, Locale::En.labels(), None, Theme::Light);
        if with_image {
            bundle.image = Some(ExportImage {
                mime_type: "image/png",
                bytes: vec![0x89, b'P', b'N', b'G'],
            });
        }
        bundle
    }

    fn opens_nothing(_: &Path) -> io::Result<()> {
        Ok(())
    }

    fn no_handler(_: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no handler"))
    }

    // =========================================================================
    // host bridge tests
    // =========================================================================

    #[tokio::test]
    async fn host_bridge_without_channel_is_unavailable() {
        let err = HostBridge::new(None).export(&bundle(false)).await.unwrap_err();

        assert_eq!(
            err,
            ExportError::Unavailable {
                strategy: "host-bridge"
            }
        );
    }

    #[tokio::test]
    async fn host_bridge_appends_one_line_per_export() {
        let dir = tempfile::tempdir().unwrap();
        let channel = dir.path().join("host.jsonl");
        let bridge = HostBridge::new(Some(channel.clone()));

        bridge.export(&bundle(false)).await.unwrap();
        let outcome = bridge.export(&bundle(false)).await.unwrap();

        assert_eq!(outcome, ExportOutcome::SentToHost);
        let written = std::fs::read_to_string(&channel).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"action":"share_result","result":{"orderNumber":"42","package":"standard","pile":"long","area":"6.0","odorRemoval":false,"totalPrice":66}}"#
        );
    }

    // =========================================================================
    // share sheet tests
    // =========================================================================

    #[tokio::test]
    async fn share_sheet_writes_image_and_opens_it() {
        let dir = tempfile::tempdir().unwrap();
        let share = ShareSheet::new(dir.path().join("out")).with_opener(opens_nothing);

        let outcome = share.export(&bundle(true)).await.unwrap();

        assert_eq!(outcome, ExportOutcome::Shared);
        let written = std::fs::read(dir.path().join("out").join(SHARE_FILE_NAME)).unwrap();
        assert_eq!(written, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn share_sheet_needs_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let share = ShareSheet::new(dir.path().to_path_buf()).with_opener(opens_nothing);

        let err = share.export(&bundle(false)).await.unwrap_err();

        assert_eq!(err, ExportError::ImageUnavailable { strategy: "os-share" });
    }

    #[tokio::test]
    async fn share_sheet_reports_missing_handler() {
        let dir = tempfile::tempdir().unwrap();
        let share = ShareSheet::new(dir.path().to_path_buf()).with_opener(no_handler);

        let err = share.export(&bundle(true)).await.unwrap_err();

        assert!(matches!(err, ExportError::Failed { strategy: "os-share", .. }));
    }

    #[tokio::test]
    async fn clipboard_image_needs_an_image() {
        let err = ClipboardImage.export(&bundle(false)).await.unwrap_err();

        assert_eq!(
            err,
            ExportError::ImageUnavailable {
                strategy: "clipboard-image"
            }
        );
    }

    // =========================================================================
    // manual and chain tests
    // =========================================================================

    #[tokio::test]
    async fn manual_instructions_print_the_summary() {
        let buffer = SharedBuffer::default();
        let manual = ManualInstructions::new(Console::new(buffer.clone()));

        let outcome = manual.export(&bundle(false)).await.unwrap();

        assert_eq!(outcome, ExportOutcome::ManualCopy);
        assert!(buffer.contents().contains("Total cost: 66 rubles"));
    }

    #[test]
    fn chains_are_ordered_from_richest_to_simplest() {
        let settings = ExportSettings {
            bridge: None,
            share_dir: PathBuf::from("/tmp/rug-calc"),
        };
        let console = Console::new(SharedBuffer::default());

        assert_eq!(
            share_chain(&settings, &console).strategy_names(),
            vec![
                "host-bridge",
                "os-share",
                "clipboard-image",
                "clipboard-text",
                "manual"
            ]
        );
        assert_eq!(
            copy_chain(&console).strategy_names(),
            vec!["clipboard-text", "manual"]
        );
    }

    #[tokio::test]
    async fn share_chain_uses_bridge_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            bridge: Some(dir.path().join("host.jsonl")),
            share_dir: dir.path().join("share"),
        };
        let chain = share_chain(&settings, &Console::new(SharedBuffer::default()));

        let report = chain.run(&bundle(false)).await.unwrap();

        assert_eq!(report.strategy, "host-bridge");
        assert!(report.fallbacks.is_empty());
    }
}
