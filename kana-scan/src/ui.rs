//! Progress and summary display for the kana-scan CLI.
//!
//! All terminal output here goes to stderr so stdout stays clean for the
//! list of available names. Uses only the `console` crate.

use console::{style, Term};
use kana_scan_lib::{ScanProgress, ScanReport, ScanStatus};

/// Single-line progress display, rewritten in place after every candidate.
///
/// Renders nothing when stderr is not a terminal, so piped and scripted
/// runs see no control characters.
#[derive(Clone)]
pub struct ProgressLine {
    term: Term,
}

impl ProgressLine {
    /// A progress line attached to stderr.
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Redraw the progress line for the given snapshot.
    pub fn render(&self, progress: &ScanProgress) {
        if !self.term.is_term() {
            return;
        }

        let remaining = match progress.eta_seconds {
            Some(secs) => format!("{}min", secs / 60),
            None => "?".to_string(),
        };

        let line = format!(
            "{} {}/{} available={} remaining={}",
            style("Checking").cyan().bold(),
            progress.processed,
            progress.total,
            style(progress.available).green(),
            remaining,
        );

        let _ = self.term.clear_line();
        let _ = self.term.write_str(&line);
    }

    /// Clear the progress line before final output.
    pub fn finish(&self) {
        if self.term.is_term() {
            let _ = self.term.clear_line();
        }
    }
}

/// Print the end-of-scan summary to stderr.
pub fn print_summary(report: &ScanReport) {
    let status = match report.status {
        ScanStatus::Completed => style("completed").green().bold(),
        ScanStatus::Interrupted => style("interrupted").yellow().bold(),
    };

    eprintln!();
    eprintln!(
        "{} {} · {}/{} candidates · {} available ({} new this run)",
        style("Scan").bold(),
        status,
        report.processed,
        report.total,
        style(report.available.len()).green().bold(),
        report.found_this_run,
    );
}
