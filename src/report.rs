//! Top-level error reporting.
//!
//! Fallible callbacks are wrapped in a [`CheckedAction`]; instead of propagating, a failure
//! becomes an [`ErrorReport`] sent over a channel. Whoever owns the [`ErrorReceiver`] drains the
//! channel once, at the application boundary, and hands each report to an [`ErrorHandler`].

use std::fmt::Write as _;
use std::io::Write;
use std::sync::Mutex;
use std::sync::mpsc::{self, SendError};

use tracing::{debug, warn};

/// How much of a report is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// The message only.
    Ok,
    /// The message followed by the whole cause chain.
    #[default]
    OkDetails,
}

/// Answer returned by [`ErrorHandler::show_and_ask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The report was acknowledged.
    Ok,
    /// The report was acknowledged and its details were shown.
    Details,
}

impl Choice {
    /// Integer code of the choice: `0` for `Ok`, `1` for `Details`.
    pub fn code(self) -> i32 {
        match self {
            Choice::Ok => 0,
            Choice::Details => 1,
        }
    }
}

/// A failure on its way to the user.
#[derive(Debug)]
pub struct ErrorReport {
    pub message: String,
    pub cause: anyhow::Error,
    pub mode: ReportMode,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>, cause: anyhow::Error, mode: ReportMode) -> Self {
        Self {
            message: message.into(),
            cause,
            mode,
        }
    }

    /// Renders the report as text according to its mode.
    pub fn render(&self) -> String {
        let mut out = self.message.clone();
        if self.mode == ReportMode::OkDetails {
            for (depth, cause) in self.cause.chain().enumerate() {
                let label = if depth == 0 { "cause" } else { "caused by" };
                let _ = write!(out, "\n  {label}: {cause}");
            }
        }
        out
    }
}

/// Presents reports to the user.
pub trait ErrorHandler {
    /// Presents `report` and returns once it is acknowledged.
    fn process(&self, report: &ErrorReport);

    /// Presents `report` and returns the user's answer.
    fn show_and_ask(&self, report: &ErrorReport) -> Choice;
}

/// Handler writing rendered reports to a writer, one block per report.
#[derive(Debug)]
pub struct WriterHandler<W> {
    out: Mutex<W>,
}

impl<W: Write> WriterHandler<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, report: &ErrorReport) {
        let Ok(mut out) = self.out.lock() else {
            warn!(message = %report.message, "error output poisoned; report lost");
            return;
        };
        if let Err(e) = writeln!(out, "{}", report.render()).and_then(|_| out.flush()) {
            warn!(message = %report.message, error = %e, "failed to write error report");
        }
    }
}

impl<W: Write> ErrorHandler for WriterHandler<W> {
    fn process(&self, report: &ErrorReport) {
        self.emit(report);
    }

    fn show_and_ask(&self, report: &ErrorReport) -> Choice {
        self.emit(report);
        match report.mode {
            ReportMode::Ok => Choice::Ok,
            ReportMode::OkDetails => Choice::Details,
        }
    }
}

/// Creates a connected sender/receiver pair for error reports.
pub fn report_channel() -> (ErrorSender, ErrorReceiver) {
    let (tx, rx) = mpsc::channel();
    (ErrorSender { tx }, ErrorReceiver { rx })
}

/// Sending half of a report channel; cheap to clone.
#[derive(Debug, Clone)]
pub struct ErrorSender {
    tx: mpsc::Sender<ErrorReport>,
}

impl ErrorSender {
    /// Queues `report`. Returns `false` when the receiver is gone and the report was dropped.
    pub fn send(&self, report: ErrorReport) -> bool {
        match self.tx.send(report) {
            Ok(()) => true,
            Err(SendError(report)) => {
                warn!(message = %report.message, "error report dropped: receiver is gone");
                false
            }
        }
    }
}

/// Receiving half of a report channel.
#[derive(Debug)]
pub struct ErrorReceiver {
    rx: mpsc::Receiver<ErrorReport>,
}

impl ErrorReceiver {
    /// Takes the next queued report without blocking.
    pub fn try_next(&self) -> Option<ErrorReport> {
        self.rx.try_recv().ok()
    }

    /// Hands every queued report to `handler` and returns how many there were.
    pub fn dispatch_pending<H: ErrorHandler + ?Sized>(&self, handler: &H) -> usize {
        let mut count = 0;
        while let Some(report) = self.try_next() {
            handler.process(&report);
            count += 1;
        }
        count
    }

    /// Hands reports to `handler` until every sender is dropped; returns how many there were.
    pub fn dispatch_until_closed<H: ErrorHandler + ?Sized>(&self, handler: &H) -> usize {
        let mut count = 0;
        for report in self.rx.iter() {
            handler.process(&report);
            count += 1;
        }
        count
    }
}

/// A callback allowed to fail; failures are reported instead of propagated.
pub struct CheckedAction<F> {
    action: F,
    message: String,
    mode: ReportMode,
    errors: ErrorSender,
}

impl<F> CheckedAction<F> {
    /// Wraps `action`; a failure is reported with `message` in [`ReportMode::OkDetails`].
    pub fn new(message: impl Into<String>, errors: ErrorSender, action: F) -> Self {
        Self {
            action,
            message: message.into(),
            mode: ReportMode::default(),
            errors,
        }
    }

    pub fn with_mode(mut self, mode: ReportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Runs the callback for `event`. Returns whether it succeeded.
    pub fn perform<E>(&mut self, event: &E) -> bool
    where
        F: FnMut(&E) -> anyhow::Result<()>,
    {
        match (self.action)(event) {
            Ok(()) => true,
            Err(cause) => {
                debug!(message = %self.message, error = %cause, "checked action failed");
                self.errors
                    .send(ErrorReport::new(self.message.clone(), cause, self.mode));
                false
            }
        }
    }
}

impl<F> std::fmt::Debug for CheckedAction<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckedAction")
            .field("message", &self.message)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use anyhow::anyhow;

    use super::*;
    use crate::{MapFS, VirtualFileSystem};

    #[test]
    fn test_render_modes() {
        let cause = anyhow!("disk unplugged").context("saving profile");
        let report = ErrorReport::new("Could not save", cause, ReportMode::OkDetails);
        assert_eq!(
            report.render(),
            "Could not save\n  cause: saving profile\n  caused by: disk unplugged"
        );

        let report = ErrorReport::new("Could not save", anyhow!("x"), ReportMode::Ok);
        assert_eq!(report.render(), "Could not save");
    }

    #[test]
    fn test_choice_codes() {
        assert_eq!(Choice::Ok.code(), 0);
        assert_eq!(Choice::Details.code(), 1);
    }

    #[test]
    fn test_checked_action_reports_vfs_failure() {
        let (errors, reports) = report_channel();
        let vfs = MapFS::new();
        let open_file = |name: &String| -> anyhow::Result<()> {
            let content = vfs.read_entry(name)?;
            anyhow::ensure!(!content.is_empty(), "{name} is empty");
            Ok(())
        };
        let mut open = CheckedAction::new("Could not open file", errors, open_file);

        assert!(!open.perform(&"missing.txt".to_string()));
        vfs.write_entry("ok.txt", b"data", false).unwrap();
        assert!(open.perform(&"ok.txt".to_string()));

        let report = reports.try_next().expect("one failure was reported");
        assert_eq!(report.message, "Could not open file");
        assert!(report.render().contains("entry not found: missing.txt"));
        assert!(reports.try_next().is_none());
    }

    #[test]
    fn test_dispatch_to_writer_handler() {
        let (errors, reports) = report_channel();
        let broken = |_: &()| -> anyhow::Result<()> { Err(anyhow!("boom")) };
        let mut fail =
            CheckedAction::new("Broken", errors.clone(), broken).with_mode(ReportMode::Ok);
        fail.perform(&());
        fail.perform(&());

        let handler = WriterHandler::new(Vec::new());
        assert_eq!(reports.dispatch_pending(&handler), 2);
        let output = String::from_utf8(handler.into_inner()).unwrap();
        assert_eq!(output, "Broken\nBroken\n");
    }

    #[test]
    fn test_show_and_ask() {
        let handler = WriterHandler::new(Vec::new());
        let report = ErrorReport::new("m", anyhow!("c"), ReportMode::OkDetails);
        assert_eq!(handler.show_and_ask(&report), Choice::Details);
        let report = ErrorReport::new("m", anyhow!("c"), ReportMode::Ok);
        assert_eq!(handler.show_and_ask(&report), Choice::Ok);
    }

    #[test]
    fn test_send_without_receiver() {
        let (errors, reports) = report_channel();
        drop(reports);
        assert!(!errors.send(ErrorReport::new("lost", anyhow!("x"), ReportMode::Ok)));
    }

    #[test]
    fn test_dispatch_until_closed_across_threads() {
        let (errors, reports) = report_channel();
        let workers: Vec<_> = (0..3)
            .map(|i| {
                let errors = errors.clone();
                thread::spawn(move || {
                    let failing = |_: &()| -> anyhow::Result<()> { Err(anyhow!("fail")) };
                    let mut action = CheckedAction::new(format!("worker {i}"), errors, failing);
                    action.perform(&());
                })
            })
            .collect();
        drop(errors);
        for worker in workers {
            worker.join().unwrap();
        }

        let handler = WriterHandler::new(Vec::new());
        assert_eq!(reports.dispatch_until_closed(&handler), 3);
    }
}
