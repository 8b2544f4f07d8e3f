//! CLI entry point for the rebrand tool.
//!
//! Rewrites rule tokens inside every text file under a root directory, then
//! renames every file and directory whose name contains a token.
//!
//! # Usage
//!
//! ```bash
//! rebrand [OPTIONS] <ROOT>
//!
//! # Rename a project using a rule file
//! rebrand ./project --config-file rules.txt --record-file rebrand.log
//!
//! # Literal rules, content pass only
//! rebrand ./project --rule Acme=Globex --rule acme=globex --pass content
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use rb_core::{Config, Rule, RuleSet, RuleSetBuilder};
use rb_engine::{
    CHANNEL_CAPACITY, Engine, EngineConfig, EngineError, LogSink, PassSummary, PassUpdate,
    RecordFormat, RecordWriter, ReportSink, SkipSet, spawn_report_thread,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Bulk rule-driven content substitution and file/directory renaming.
///
/// Every text file under ROOT has its rule tokens replaced in its original
/// encoding; binary files are never touched. Afterwards every file and
/// directory whose name contains a token is renamed, deepest paths first.
#[derive(Parser)]
#[command(name = "rebrand", version, about, long_about = None)]
struct Cli {
    /// Root directory of the tree to transform.
    #[arg(env = "REBRAND_ROOT")]
    root: Utf8PathBuf,

    /// Rule file with one whitespace-separated `old new` pair per line.
    #[arg(short = 'c', long, env = "REBRAND_CONFIG_FILE")]
    config_file: Option<Utf8PathBuf>,

    /// Literal rule `OLD=NEW`, applied after rule-file rules. Repeatable.
    #[arg(short, long = "rule", value_name = "OLD=NEW")]
    rules: Vec<String>,

    /// File receiving one line per processed path.
    #[arg(long, env = "REBRAND_RECORD_FILE")]
    record_file: Option<Utf8PathBuf>,

    /// Record file format.
    #[arg(long, value_enum, default_value_t = RecordFormatArg::Text, env = "REBRAND_RECORD_FORMAT")]
    record_format: RecordFormatArg,

    /// JSON settings file (workers, skip list, traversal options).
    #[arg(long, env = "REBRAND_SETTINGS")]
    settings: Option<Utf8PathBuf>,

    /// Which passes to run.
    #[arg(long, value_enum, default_value_t = PassSelection::All)]
    pass: PassSelection,

    /// Content-rewrite worker threads (defaults to available parallelism).
    #[arg(short, long, env = "REBRAND_WORKERS")]
    workers: Option<usize>,

    /// Additional file or directory name to skip. Repeatable.
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,

    /// Rename the root directory itself after everything below it.
    #[arg(long)]
    rename_root: bool,

    /// Substitute only the stem of file names, keeping extensions.
    #[arg(long)]
    keep_extensions: bool,

    /// Record paths the rename pass left unchanged.
    #[arg(long)]
    report_unchanged: bool,

    /// Exclude paths listed in `.gitignore` and `.ignore` files.
    #[arg(long)]
    respect_gitignore: bool,

    /// Follow symbolic links while walking.
    #[arg(long)]
    follow_links: bool,

    /// Log level filter (overridden by `RUST_LOG`).
    #[arg(long, env = "REBRAND_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Record file format.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum RecordFormatArg {
    /// Tab-separated text lines.
    Text,
    /// JSON lines.
    Json,
}

impl From<RecordFormatArg> for RecordFormat {
    fn from(arg: RecordFormatArg) -> Self {
        match arg {
            RecordFormatArg::Text => Self::Text,
            RecordFormatArg::Json => Self::Json,
        }
    }
}

/// Passes to run.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum PassSelection {
    /// Content rewrite only.
    Content,
    /// Renames only.
    Rename,
    /// Content rewrite, then renames.
    All,
}

impl PassSelection {
    const fn includes_content(self) -> bool {
        matches!(self, Self::Content | Self::All)
    }

    const fn includes_rename(self) -> bool {
        matches!(self, Self::Rename | Self::All)
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins if set. Otherwise `--log-level` is used, then `debug`
/// with `--verbose`, then `info`.
fn init_tracing(log_level: Option<&str>, verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = log_level.unwrap_or(if verbose { "debug" } else { "info" });
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Loads the settings file, if any, and applies CLI overrides.
fn build_settings(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.settings {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if cli.workers.is_some() {
        config.run.workers = cli.workers;
    }
    config.run.follow_links |= cli.follow_links;
    config.run.respect_gitignore |= cli.respect_gitignore;
    config.run.rename_root |= cli.rename_root;
    config.run.keep_extensions |= cli.keep_extensions;
    config.run.report_unchanged |= cli.report_unchanged;
    config.skip.names.extend(cli.skip.iter().cloned());

    config.validate()?;
    Ok(config)
}

/// Builds the rule set from the rule file and `--rule` literals.
///
/// Dropped rules are logged; an empty result is an error.
fn build_rules(cli: &Cli) -> color_eyre::Result<RuleSet> {
    let mut builder = RuleSetBuilder::new();
    if let Some(path) = &cli.config_file {
        builder.add_file(path)?;
    }
    for literal in &cli.rules {
        builder.add(Rule::parse_literal(literal)?, "--rule");
    }

    for warning in builder.warnings() {
        warn!("{warning}");
    }

    let rules = builder.build()?;
    info!(rules = rules.len(), "Loaded rule set");
    Ok(rules)
}

/// Builds the skip set: settings entries, the tool's own executable, and
/// the files this run reads or writes.
fn build_skip_set(config: &Config, own_files: &[&Utf8Path]) -> SkipSet {
    let mut skip = SkipSet::from_config(&config.skip);

    if let Some(exe) = std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_owned))
    {
        skip = skip.with_name(exe);
    }

    for path in own_files {
        match path.canonicalize_utf8() {
            Ok(canonical) => skip = skip.with_path(canonical),
            Err(e) => warn!(path = %path, error = %e, "Cannot resolve path for skip list"),
        }
    }
    skip
}

/// Sets the cancellation flag on Ctrl-C.
fn install_interrupt_handler(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight files");
            cancel.store(true, Ordering::Relaxed);
        }
    });
}

// =============================================================================
// PASS EXECUTION
// =============================================================================

/// Runs the selected passes in order on the current thread.
///
/// The rename pass is skipped once cancellation was requested.
fn run_passes(
    engine: &Engine,
    passes: PassSelection,
    tx: mpsc::Sender<PassUpdate>,
) -> Result<(), EngineError> {
    if passes.includes_content() {
        engine.run_content_pass(tx.clone())?;
    }
    if passes.includes_rename() && !engine.is_cancelled() {
        engine.run_rename_pass(tx)?;
    }
    Ok(())
}

/// Prints the per-pass summaries.
fn print_summaries(summaries: &[PassSummary]) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for summary in summaries {
        writeln!(handle)?;
        writeln!(handle, "{summary}")?;
    }
    Ok(())
}

/// Returns `true` if no pass recorded an error or was interrupted.
fn run_succeeded(summaries: &[PassSummary]) -> bool {
    summaries
        .iter()
        .all(|s| s.stats.is_clean() && !s.cancelled)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing
    init_tracing(cli.log_level.as_deref(), cli.verbose, cli.no_color);

    // 4. Settings and rules
    if !cli.root.is_dir() {
        return Err(eyre!("Root is not an existing directory: {}", cli.root));
    }
    let settings = build_settings(&cli)?;
    let rules = build_rules(&cli)?;

    // 5. Record file, created before the skip set so it can be resolved
    let record = cli
        .record_file
        .as_deref()
        .map(|path| {
            RecordWriter::create(path, cli.record_format.into())
                .wrap_err_with(|| format!("Cannot create record file {path}"))
        })
        .transpose()?;

    let own_files: Vec<&Utf8Path> = [
        cli.record_file.as_deref(),
        cli.config_file.as_deref(),
        cli.settings.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    let skip = build_skip_set(&settings, &own_files);

    // 6. Engine
    let config = EngineConfig::from_run_config(&cli.root, &settings.run).with_filter(skip);
    let engine = Engine::new(config, rules)?;
    install_interrupt_handler(engine.cancel_handle());

    // 7. Report thread is the sole writer of the record file
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let mut sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(LogSink)];
    if let Some(writer) = record {
        sinks.push(Box::new(writer));
    }
    let report = spawn_report_thread(rx, sinks)?;

    // 8. Passes run off the async runtime; they block on channel sends
    let worker = engine.clone();
    let passes = cli.pass;
    let result = tokio::task::spawn_blocking(move || run_passes(&worker, passes, tx)).await?;

    let summaries = report
        .join()
        .map_err(|_| eyre!("Report thread panicked"))?;
    result?;

    print_summaries(&summaries)?;
    if run_succeeded(&summaries) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
