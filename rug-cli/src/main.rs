use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rug_core::input::parse_dimension;
use rug_core::render::Theme;
use rug_core::{Locale, Package, Pile};
use tokio::io::BufReader;
use tracing::debug;

use rug_cli::config::{AppConfig, Overrides};
use rug_cli::{Console, ExportKind, QuoteOptions, QuoteRequest, Session, build_context, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Rug cleaning cost calculator.
///
/// Walks through package, pile type, dimensions and add-ons, then shows
/// the quote and can share or copy it.
#[derive(Debug, Parser)]
#[command(name = "rug-calc", version)]
struct Cli {
    /// Configuration file. Defaults to `rug-calc.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Interface language: `en` or `ru`.
    #[arg(long, global = true, value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Colour scheme of the result image: `light` or `dark`.
    #[arg(long, global = true, value_parser = parse_theme)]
    theme: Option<Theme>,

    /// Host bridge channel; each shared result is appended as a JSON line.
    #[arg(long, global = true)]
    bridge: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `rug_core=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive step-by-step wizard (default).
    Wizard,
    /// Compute a single quote from flags.
    Quote(QuoteArgs),
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// `standard` or `premium`.
    #[arg(long, value_parser = parse_package)]
    package: Package,

    /// `short` or `long`.
    #[arg(long, value_parser = parse_pile)]
    pile: Pile,

    /// Length in meters; a decimal comma is accepted.
    #[arg(long)]
    length: String,

    /// Width in meters; a decimal comma is accepted.
    #[arg(long)]
    width: String,

    #[arg(long)]
    odor_removal: bool,

    /// Order number shown on the result.
    #[arg(long, default_value = "")]
    order: String,

    /// Print the host payload as JSON instead of the text summary.
    #[arg(long)]
    json: bool,

    /// Write the result image to this PNG file.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Run the share chain after printing.
    #[arg(long, conflicts_with = "copy")]
    share: bool,

    /// Run the copy chain after printing.
    #[arg(long)]
    copy: bool,
}

impl QuoteArgs {
    fn request(&self) -> QuoteRequest {
        QuoteRequest {
            package: self.package,
            pile: self.pile,
            length: parse_dimension(&self.length),
            width: parse_dimension(&self.width),
            odor_removal: self.odor_removal,
            order_number: self.order.trim().to_string(),
        }
    }

    fn options(&self) -> QuoteOptions {
        let export = if self.share {
            Some(ExportKind::Share)
        } else if self.copy {
            Some(ExportKind::Copy)
        } else {
            None
        };
        QuoteOptions {
            json: self.json,
            png: self.png.clone(),
            export,
        }
    }
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    Locale::parse(s).ok_or_else(|| format!("unknown locale '{s}', expected en or ru"))
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::parse(s).ok_or_else(|| format!("unknown theme '{s}', expected light or dark"))
}

fn parse_package(s: &str) -> Result<Package, String> {
    Package::parse(s).ok_or_else(|| format!("unknown package '{s}', expected standard or premium"))
}

fn parse_pile(s: &str) -> Result<Pile, String> {
    Pile::parse(s).ok_or_else(|| format!("unknown pile '{s}', expected short or long"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply(Overrides {
        locale: cli.locale,
        theme: cli.theme,
        bridge: cli.bridge,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });

    logging::init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(locale = %config.locale, theme = ?config.theme, "configuration ready");

    let ctx = build_context(&config, Console::stdout());

    match cli.command.unwrap_or(Command::Wizard) {
        Command::Wizard => {
            let stdin = BufReader::new(tokio::io::stdin());
            Session::new(ctx).run(stdin).await.context("reading input")?;
        }
        Command::Quote(args) => {
            rug_cli::run_quote(&ctx, &args.request(), &args.options()).await?;
        }
    }

    Ok(())
}
