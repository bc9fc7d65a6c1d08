//! Line-driven wizard dialogue.
//!
//! Each input line is translated into one or more [`Action`]s for the
//! [`StepController`]. What a line means depends on the current step:
//!
//! | Step       | Input                                             |
//! |------------|---------------------------------------------------|
//! | main       | anything (Enter) starts                           |
//! | package    | `1`/`2`, `standard`/`premium` or the shown name   |
//! | pile       | `1`/`2`, `short`/`long` or the shown name         |
//! | dimensions | `3 2.5`, `3x2,5`; Enter re-checks the last values |
//! | extra      | yes/no (`y`, `n`, `да`, `нет`); Enter keeps it    |
//! | order      | free text, may be empty                           |
//! | result     | `share`, `copy`                                   |
//!
//! `back`, `new` and `quit` work on every step. Rejected actions are
//! reported through the [`Notifier`] and leave the wizard unchanged.
//! Exports run as background tasks so the dialogue stays responsive; they
//! are awaited when the session finishes.

use std::io;
use std::sync::Arc;

use rug_core::calculations::common::round_area;
use rug_core::export::{ExportBundle, ExportChain};
use rug_core::format::display_fields;
use rug_core::input::{parse_dimension, split_dimensions};
use rug_core::notify::{Notification, Notifier};
use rug_core::render::{ResultRenderer, Theme};
use rug_core::{
    Action, Labels, Locale, Package, Pile, PricingTable, Step, StepController, Wizard,
};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::logging::log_task_error;
use crate::notify::Console;

/// Everything a session needs besides its own wizard.
pub struct ShellContext {
    pub pricing: PricingTable,
    pub locale: Locale,
    pub theme: Theme,
    pub renderer: Option<Arc<dyn ResultRenderer>>,
    pub share: ExportChain,
    pub copy: ExportChain,
    pub notifier: Arc<dyn Notifier>,
    pub console: Console,
}

impl ShellContext {
    pub fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }

    pub fn chain(
        &self,
        kind: ExportKind,
    ) -> &ExportChain {
        match kind {
            ExportKind::Share => &self.share,
            ExportKind::Copy => &self.copy,
        }
    }
}

/// Which export flow a command starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Share,
    Copy,
}

/// Whether the session wants more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Command {
    Quit,
    New,
    Back,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "quit" | "exit" | "выход" => Some(Self::Quit),
            "new" | "новый" => Some(Self::New),
            "back" | "назад" => Some(Self::Back),
            _ => None,
        }
    }
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "y" | "yes" | "д" | "да" | "1" | "+" => Some(true),
        "n" | "no" | "н" | "нет" | "0" | "-" => Some(false),
        _ => None,
    }
}

/// Picks an option by 1-based number, code or display name.
fn choose<T: Copy>(
    input: &str,
    options: &[T],
    parse: fn(&str) -> Option<T>,
    display_name: impl Fn(T) -> &'static str,
) -> Option<T> {
    if let Ok(number) = input.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .copied();
    }
    parse(input).or_else(|| {
        let wanted = input.to_lowercase();
        options
            .iter()
            .copied()
            .find(|option| display_name(*option).to_lowercase() == wanted)
    })
}

/// One user's pass through the wizard.
pub struct Session {
    ctx: Arc<ShellContext>,
    wizard: Wizard,
    exports: JoinSet<()>,
}

impl Session {
    pub fn new(ctx: ShellContext) -> Self {
        Self {
            ctx: Arc::new(ctx),
            wizard: Wizard::new(),
            exports: JoinSet::new(),
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Number of exports started and not yet collected.
    pub fn pending_exports(&self) -> usize {
        self.exports.len()
    }

    /// Reads lines until EOF or `quit`, then waits for running exports.
    pub async fn run<R>(
        mut self,
        input: R,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.show_prompt();

        while let Some(line) = lines.next_line().await? {
            if self.handle_line(&line) == Flow::Quit {
                break;
            }
        }

        self.finish().await;
        Ok(())
    }

    /// Handles one line of input. Must be called inside a Tokio runtime,
    /// since exports are spawned onto it.
    pub fn handle_line(
        &mut self,
        line: &str,
    ) -> Flow {
        self.reap_exports();
        let input = line.trim();

        match Command::parse(input) {
            Some(Command::Quit) => return Flow::Quit,
            Some(Command::New) => {
                self.dispatch(vec![Action::NewCalculation]);
            }
            Some(Command::Back) => {
                self.dispatch(vec![Action::Back]);
            }
            None => self.step_input(input),
        }
        Flow::Continue
    }

    /// Waits for every export started so far; returns how many finished.
    pub async fn finish(mut self) -> usize {
        if !self.exports.is_empty() {
            debug!(pending = self.exports.len(), "waiting for exports");
        }
        let mut finished = 0;
        while let Some(joined) = self.exports.join_next().await {
            log_task_error("export", joined.map_err(anyhow::Error::from));
            finished += 1;
        }
        finished
    }

    fn step_input(
        &mut self,
        input: &str,
    ) {
        let labels = self.ctx.labels();

        let actions = match self.wizard.step() {
            Step::Main => vec![Action::Start],
            Step::Package => {
                match choose(input, Package::all(), Package::parse, |p| labels.package_name(p)) {
                    Some(package) => vec![Action::SelectPackage(package)],
                    None => return self.unrecognized(),
                }
            }
            Step::Pile { .. } => {
                match choose(input, Pile::all(), Pile::parse, |p| labels.pile_name(p)) {
                    Some(pile) => vec![Action::SelectPile(pile)],
                    None => return self.unrecognized(),
                }
            }
            Step::Dimensions => {
                if !input.is_empty() {
                    let (length, width) = split_dimensions(input);
                    let edits = vec![
                        Action::SetLength(parse_dimension(length)),
                        Action::SetWidth(parse_dimension(width)),
                    ];
                    if !self.dispatch(edits) {
                        return;
                    }
                    self.show_area_preview();
                }
                vec![Action::Next]
            }
            Step::Extra => {
                if input.is_empty() {
                    vec![Action::Next]
                } else {
                    match parse_yes_no(input) {
                        Some(enabled) => vec![Action::SetOdorRemoval(enabled), Action::Next],
                        None => return self.unrecognized(),
                    }
                }
            }
            Step::Order => vec![
                Action::SetOrderNumber(input.to_string()),
                Action::Calculate,
            ],
            Step::Result { .. } => {
                match input.to_lowercase().as_str() {
                    "share" => self.spawn_export(ExportKind::Share),
                    "copy" => self.spawn_export(ExportKind::Copy),
                    "" => self.show_prompt(),
                    _ => self.unrecognized(),
                }
                return;
            }
        };

        self.dispatch(actions);
    }

    /// Applies `actions` in order, keeping every accepted one and stopping
    /// at the first rejection. Returns true if all were accepted.
    fn dispatch(
        &mut self,
        actions: Vec<Action>,
    ) -> bool {
        let labels = self.ctx.labels();
        let controller = StepController::new(&self.ctx.pricing);
        let before = self.wizard.step().name();

        for action in actions {
            match controller.apply(&self.wizard, action) {
                Ok(next) => self.wizard = next,
                Err(error) => {
                    self.ctx
                        .notifier
                        .notify(Notification::error(labels.wizard_error(&error)));
                    self.show_prompt();
                    return false;
                }
            }
        }

        if let Step::Result { result } = self.wizard.step() {
            info!(
                package = result.package.as_str(),
                pile = result.pile.as_str(),
                area = %result.area,
                total = %result.total_price,
                "quote calculated"
            );
        }
        if self.wizard.step().name() != before {
            self.show_prompt();
        }
        true
    }

    fn unrecognized(&self) {
        let labels = self.ctx.labels();
        self.ctx
            .notifier
            .notify(Notification::error(labels.unknown_choice));
        self.show_prompt();
    }

    fn spawn_export(
        &mut self,
        kind: ExportKind,
    ) {
        let Step::Result { result } = self.wizard.step() else {
            return;
        };
        let result = result.clone();
        let state = self.wizard.state().clone();
        let ctx = Arc::clone(&self.ctx);

        debug!(?kind, "export started");
        self.exports.spawn(async move {
            let labels = ctx.labels();
            let renderer = match kind {
                ExportKind::Share => ctx.renderer.as_deref(),
                ExportKind::Copy => None,
            };
            let bundle = ExportBundle::prepare(&result, &state, labels, renderer, ctx.theme);

            if let Ok(report) = ctx
                .chain(kind)
                .run_and_notify(&bundle, labels, ctx.notifier.as_ref())
                .await
            {
                debug!(
                    ?kind,
                    strategy = report.strategy,
                    fallbacks = report.fallbacks.len(),
                    "export finished"
                );
            }
        });
    }

    fn reap_exports(&mut self) {
        while let Some(joined) = self.exports.try_join_next() {
            log_task_error("export", joined.map_err(anyhow::Error::from));
        }
    }

    fn show_area_preview(&self) {
        if let Some(area) = self.wizard.state().area_preview() {
            let labels = self.ctx.labels();
            self.ctx.console.line(&format!(
                "{} {} {}",
                labels.area_label,
                round_area(area),
                labels.area_unit
            ));
        }
    }

    /// Prints what the current step expects.
    pub fn show_prompt(&self) {
        let labels = self.ctx.labels();
        let console = &self.ctx.console;

        match self.wizard.step() {
            Step::Main => {
                console.line(labels.welcome);
                console.line(labels.start_hint);
            }
            Step::Package => {
                console.line(labels.package_prompt);
                for (i, package) in Package::all().iter().enumerate() {
                    console.line(&format!("  {}) {}", i + 1, labels.package_name(*package)));
                }
                console.line(labels.back_hint);
            }
            Step::Pile { rates } => {
                console.line(labels.pile_prompt);
                for (i, pile) in Pile::all().iter().enumerate() {
                    console.line(&format!(
                        "  {}) {}: {} {}",
                        i + 1,
                        labels.pile_name(*pile),
                        rate_text(rates.get(*pile)),
                        labels.rate_unit
                    ));
                }
                console.line(labels.back_hint);
            }
            Step::Dimensions => {
                console.line(labels.dimensions_prompt);
                console.line(labels.back_hint);
            }
            Step::Extra => {
                console.line(labels.extra_prompt);
                console.line(labels.back_hint);
            }
            Step::Order => {
                console.line(labels.order_prompt);
                console.line(labels.back_hint);
            }
            Step::Result { result } => {
                let fields = display_fields(result, self.wizard.state(), labels);
                console.blank();
                console.line(fields.title);
                for row in fields.rows() {
                    console.line(&format!("{} {}", row.label, row.value));
                }
                console.blank();
                console.line(labels.result_hint);
            }
        }
    }
}

fn rate_text(rate: Decimal) -> String {
    rate.normalize().to_string()
}
