//! Bounded fan-out of identical provider calls
//!
//! Issues N calls with at most C in flight, waits for all of them to settle
//! and reports each one as a [`RunOutcome`]. A failing or timed-out call
//! never aborts its siblings and is never retried.

use crate::ports::llm_provider::ProviderError;
use crate::ports::progress::ConsensusProgress;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Limits for one fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutLimits {
    /// Maximum calls in flight at once (0 is treated as 1)
    pub max_concurrent: usize,
    /// Per-call timeout; waiting for a concurrency slot is not counted
    pub timeout: Duration,
}

impl FanOutLimits {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            max_concurrent,
            timeout,
        }
    }
}

/// Settled state of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    Completed { index: usize, value: T },
    Failed { index: usize, reason: String },
}

impl<T> RunOutcome<T> {
    pub fn index(&self) -> usize {
        match self {
            RunOutcome::Completed { index, .. } | RunOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    /// The value of a completed call
    pub fn completed(self) -> Option<T> {
        match self {
            RunOutcome::Completed { value, .. } => Some(value),
            RunOutcome::Failed { .. } => None,
        }
    }
}

/// Run `call` `n` times and return every outcome, ordered by run index.
///
/// `call` receives the run index and produces the future for that run. The
/// concurrency limiter is created here and lives only for this invocation.
pub async fn run_all<T, F, Fut>(
    n: usize,
    limits: FanOutLimits,
    call: F,
    progress: &dyn ConsensusProgress,
) -> Vec<RunOutcome<T>>
where
    T: Send + 'static,
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
{
    info!(
        "Starting {} runs (max {} concurrent, timeout {:?})",
        n, limits.max_concurrent, limits.timeout
    );
    progress.on_runs_start(n);

    let semaphore = Arc::new(Semaphore::new(limits.max_concurrent.max(1)));
    let mut join_set = JoinSet::new();

    for index in 0..n {
        let semaphore = Arc::clone(&semaphore);
        let future = call(index);
        let timeout = limits.timeout;

        join_set.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return (index, Err(ProviderError::Other(e.to_string()))),
            };
            debug!("Run {} started", index);

            match tokio::time::timeout(timeout, future).await {
                Ok(result) => (index, result),
                Err(_) => (index, Err(ProviderError::Timeout(timeout))),
            }
        });
    }

    let mut outcomes = Vec::with_capacity(n);

    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((index, Ok(value))) => {
                debug!("Run {} completed", index);
                progress.on_run_complete(index, true);
                outcomes.push(RunOutcome::Completed { index, value });
            }
            Ok((index, Err(e))) => {
                warn!("Run {} failed: {}", index, e);
                progress.on_run_complete(index, false);
                outcomes.push(RunOutcome::Failed {
                    index,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                // The run index is lost with a panicked task
                warn!("Task join error: {}", e);
            }
        }
    }

    outcomes.sort_by_key(RunOutcome::index);

    let succeeded = outcomes.iter().filter(|o| o.is_completed()).count();
    info!("{}/{} runs succeeded", succeeded, n);
    progress.on_runs_complete(succeeded, n);

    outcomes
}

/// Run `call` `n` times and keep only the successful values.
///
/// Returns an empty list (not an error) when every call fails.
pub async fn run_n_times<T, F, Fut>(
    n: usize,
    limits: FanOutLimits,
    call: F,
    progress: &dyn ConsensusProgress,
) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
{
    run_all(n, limits, call, progress)
        .await
        .into_iter()
        .filter_map(RunOutcome::completed)
        .collect()
}
