//! Outcome reporting.
//!
//! Workers never write reports themselves. They send [`PassUpdate`]s over a
//! bounded `tokio` channel, and a single report thread started with
//! [`spawn_report_thread`] drains it and hands every update to the
//! configured [`ReportSink`]s. That thread is the only writer of the record
//! file.
//!
//! # Channel Protocol
//!
//! For each pass, updates arrive in this order:
//!
//! 1. [`PassUpdate::Started`], once, after the walk
//! 2. [`PassUpdate::Outcome`], once per path, in no particular order
//! 3. [`PassUpdate::Complete`], once, after every outcome was sent

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::thread::JoinHandle;

use camino::Utf8Path;
use rb_core::{Outcome, OutcomeStatus, Pass};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::stats::{PassStats, PassSummary};

/// Capacity of the outcome channel.
pub const CHANNEL_CAPACITY: usize = 256;

/// Update sent while a pass runs.
///
/// The `Outcome` variant is boxed to keep the enum small on the channel.
#[derive(Debug, Clone)]
pub enum PassUpdate {
    /// The walk finished and `candidates` paths will be processed.
    Started {
        /// Which pass is starting.
        pass: Pass,
        /// Number of paths the pass will report on.
        candidates: usize,
    },

    /// One path was processed.
    Outcome(Box<Outcome>),

    /// The pass finished; no more outcomes follow for it.
    Complete(PassSummary),
}

/// Consumer of pass updates, driven by the report thread.
///
/// Every method has a no-op default so sinks implement only what they need.
pub trait ReportSink: Send {
    /// Called once per pass before any outcome.
    fn pass_started(&mut self, _pass: Pass, _candidates: usize) -> io::Result<()> {
        Ok(())
    }

    /// Called once per outcome.
    fn record(&mut self, outcome: &Outcome) -> io::Result<()>;

    /// Called once per pass after its last outcome.
    fn pass_complete(&mut self, _summary: &PassSummary) -> io::Result<()> {
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn pass_started(&mut self, pass: Pass, candidates: usize) -> io::Result<()> {
        (**self).pass_started(pass, candidates)
    }

    fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        (**self).record(outcome)
    }

    fn pass_complete(&mut self, summary: &PassSummary) -> io::Result<()> {
        (**self).pass_complete(summary)
    }
}

/// Line format of the record file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    /// Tab-separated `pass status path [-> new_path] [encoding] [kind: reason]`.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes one line per outcome and flushes after every line.
///
/// # Examples
///
/// ```
/// use rb_core::Outcome;
/// use rb_engine::{RecordFormat, RecordWriter, ReportSink};
///
/// let mut writer = RecordWriter::new(Vec::new(), RecordFormat::Text);
/// writer.record(&Outcome::renamed("root/Old", "root/New")).unwrap();
///
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "rename\trenamed\troot/Old\t-> root/New\n");
/// ```
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    writer: W,
    format: RecordFormat,
}

impl RecordWriter<BufWriter<File>> {
    /// Creates (or truncates) the record file at `path`.
    pub fn create(path: &Utf8Path, format: RecordFormat) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write> RecordWriter<W> {
    /// Wraps any writer.
    pub const fn new(writer: W, format: RecordFormat) -> Self {
        Self { writer, format }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_text(&mut self, outcome: &Outcome) -> io::Result<()> {
        write!(
            self.writer,
            "{}\t{}\t{}",
            outcome.pass, outcome.status, outcome.path
        )?;
        if let Some(new_path) = &outcome.new_path {
            write!(self.writer, "\t-> {new_path}")?;
        }
        if let Some(encoding) = &outcome.encoding {
            write!(self.writer, "\t{encoding}")?;
        }
        if let Some(error) = &outcome.error {
            write!(self.writer, "\t{}: {}", error.kind.label(), error.reason)?;
        }
        writeln!(self.writer)
    }

    fn write_json(&mut self, outcome: &Outcome) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, outcome)?;
        writeln!(self.writer)
    }
}

impl<W: Write + Send> ReportSink for RecordWriter<W> {
    fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        match self.format {
            RecordFormat::Text => self.write_text(outcome)?,
            RecordFormat::Json => self.write_json(outcome)?,
        }
        self.writer.flush()
    }
}

/// Logs outcomes through `tracing`.
///
/// Errors are logged at `warn`, changes at `info`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn pass_started(&mut self, pass: Pass, candidates: usize) -> io::Result<()> {
        info!(%pass, candidates, "Pass started");
        Ok(())
    }

    fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        match (&outcome.error, outcome.status) {
            (Some(error), _) => warn!(
                path = %outcome.path,
                kind = error.kind.label(),
                reason = %error.reason,
                "Failed"
            ),
            (None, OutcomeStatus::Rewritten) => info!(path = %outcome.path, "Rewrote"),
            (None, OutcomeStatus::Renamed) => info!(
                path = %outcome.path,
                new_path = outcome.new_path.as_ref().map(|p| p.as_str()),
                "Renamed"
            ),
            (None, status) => debug!(path = %outcome.path, %status, "Processed"),
        }
        Ok(())
    }

    fn pass_complete(&mut self, summary: &PassSummary) -> io::Result<()> {
        info!(
            pass = %summary.pass,
            total = summary.stats.total,
            changed = summary.stats.changed,
            unchanged = summary.stats.unchanged,
            skipped = summary.stats.skipped,
            errors = summary.stats.errors,
            cancelled = summary.cancelled,
            "Pass completed"
        );
        Ok(())
    }
}

/// Starts the report thread.
///
/// The thread runs until every sender is dropped and returns the summaries
/// of all passes it saw. A sink that fails to write is logged once and
/// disabled; the other sinks keep receiving updates.
pub fn spawn_report_thread(
    mut rx: mpsc::Receiver<PassUpdate>,
    sinks: Vec<Box<dyn ReportSink>>,
) -> io::Result<JoinHandle<Vec<PassSummary>>> {
    std::thread::Builder::new()
        .name("rebrand-report".to_owned())
        .spawn(move || {
            let mut sinks: Vec<Option<Box<dyn ReportSink>>> = sinks.into_iter().map(Some).collect();
            let mut summaries = Vec::new();

            while let Some(update) = rx.blocking_recv() {
                for slot in &mut sinks {
                    let Some(sink) = slot else { continue };
                    let result = match &update {
                        PassUpdate::Started { pass, candidates } => {
                            sink.pass_started(*pass, *candidates)
                        }
                        PassUpdate::Outcome(outcome) => sink.record(outcome),
                        PassUpdate::Complete(summary) => sink.pass_complete(summary),
                    };
                    if let Err(e) = result {
                        warn!(error = %e, "Report sink failed, disabling it");
                        *slot = None;
                    }
                }
                if let PassUpdate::Complete(summary) = update {
                    summaries.push(summary);
                }
            }

            summaries
        })
}

/// Counts `outcome` and sends it to the report thread.
///
/// A dropped receiver is ignored; the pass still completes its work.
pub(crate) fn emit(tx: &mpsc::Sender<PassUpdate>, stats: &PassStats, outcome: Outcome) {
    stats.record(&outcome);
    let _ = tx.blocking_send(PassUpdate::Outcome(Box::new(outcome)));
}
