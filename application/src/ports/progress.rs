//! Progress notification port
//!
//! Defines the interface for reporting progress while consensus runs are
//! in flight.

/// Callback for progress updates during a consensus request
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, etc.)
pub trait ConsensusProgress: Send + Sync {
    /// Called once before any run is issued
    fn on_runs_start(&self, total: usize);

    /// Called as each run settles, in completion order
    fn on_run_complete(&self, index: usize, success: bool);

    /// Called after every run has settled
    fn on_runs_complete(&self, succeeded: usize, total: usize);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ConsensusProgress for NoProgress {
    fn on_runs_start(&self, _total: usize) {}
    fn on_run_complete(&self, _index: usize, _success: bool) {}
    fn on_runs_complete(&self, _succeeded: usize, _total: usize) {}
}
