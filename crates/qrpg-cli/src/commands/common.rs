//! Shared helpers for CLI commands.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qrpg_core::{GenerationReport, Histogram};
use qrpg_hal::{JobId, JobObserver, JobStatus};

/// Widest histogram bar, in blocks.
pub const BAR_WIDTH: usize = 40;

/// Spinner that follows a generation.
///
/// Status transitions replace the spinner text; progress messages are
/// printed above it so they stay in the scrollback.
pub struct SpinnerObserver {
    spinner: ProgressBar,
}

impl SpinnerObserver {
    /// Start a spinner with an initial message.
    pub fn start(message: impl Into<String>) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl JobObserver for SpinnerObserver {
    fn on_status(&self, job_id: &JobId, status: &JobStatus) {
        self.spinner
            .println(format!("  {}", status_line(job_id, status)));
        self.spinner.set_message(format!("Job {job_id}: {status}"));
    }

    fn on_message(&self, message: &str) {
        self.spinner.println(format!("  {message}"));
        self.spinner.set_message(message.to_string());
    }
}

fn status_line(job_id: &JobId, status: &JobStatus) -> String {
    let status = match status {
        JobStatus::Completed => style(status.to_string()).green(),
        JobStatus::Failed(_) | JobStatus::Cancelled => style(status.to_string()).red(),
        JobStatus::Queued | JobStatus::Running => style(status.to_string()).yellow(),
    };
    format!("Job {job_id}: {status}")
}

/// Histogram lines, one per distinct outcome.
pub fn histogram_lines(histogram: &Histogram) -> Vec<String> {
    histogram.render_bars(BAR_WIDTH)
}

/// Print a finished run in human-readable form.
pub fn print_report(report: &GenerationReport) {
    println!();
    println!("{}", style("Histogram:").bold());
    for line in histogram_lines(&report.histogram) {
        println!("  {line}");
    }
    println!();
    println!(
        "  {} shots on {} (job {}, {} ms)",
        report.shots,
        style(&report.backend).yellow(),
        report.job_id,
        report.elapsed_ms
    );
    println!();
    println!(
        "{} {}",
        style("Password:").cyan().bold(),
        style(report.password.as_str()).green().bold()
    );
}
