//! Progress reporting for consensus runs

use colored::Colorize;
use consensus_application::ConsensusProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Progress bar over the N runs of one consensus request
pub struct ProgressReporter {
    label: String,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_label("Consensus runs")
    }

    /// Reporter whose bar is prefixed with `label`, e.g. the stage name.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsensusProgress for ProgressReporter {
    fn on_runs_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_prefix(self.label.clone());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_run_complete(&self, index: usize, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} run {}", "v".green(), index + 1)
            } else {
                format!("{} run {}", "x".red(), index + 1)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_runs_complete(&self, succeeded: usize, total: usize) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            let message = format!("{}/{} succeeded", succeeded, total);
            if succeeded == total {
                pb.finish_with_message(message.green().to_string());
            } else {
                pb.finish_with_message(message.yellow().to_string());
            }
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ConsensusProgress for SimpleProgress {
    fn on_runs_start(&self, total: usize) {
        eprintln!("{} {} ({} runs)", "->".cyan(), "Consensus".bold(), total);
    }

    fn on_run_complete(&self, index: usize, success: bool) {
        if success {
            eprintln!("  {} run {}", "v".green(), index + 1);
        } else {
            eprintln!("  {} run {} (failed)", "x".red(), index + 1);
        }
    }

    fn on_runs_complete(&self, succeeded: usize, total: usize) {
        eprintln!("  {}/{} runs succeeded", succeeded, total);
    }
}
