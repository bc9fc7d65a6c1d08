use std::sync::Arc;

use rug_render::PngResultRenderer;

use crate::config::AppConfig;
use crate::exporters::{ExportSettings, copy_chain, share_chain};
use crate::notify::{Console, TerminalNotifier};
use crate::shell::ShellContext;

/// Wires the configured pricing, renderer and export chains to `console`.
pub fn build_context(
    config: &AppConfig,
    console: Console,
) -> ShellContext {
    let settings = ExportSettings::from_config(config);

    ShellContext {
        pricing: config.pricing.clone(),
        locale: config.locale,
        theme: config.theme,
        renderer: Some(Arc::new(PngResultRenderer::with_scale(config.image_scale))),
        share: share_chain(&settings, &console),
        copy: copy_chain(&console),
        notifier: Arc::new(TerminalNotifier::new(console.clone())),
        console,
    }
}
