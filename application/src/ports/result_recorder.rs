//! Port for recording finished consensus results.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while a recorder keeps the full result in a
//! machine-readable form (e.g. one JSONL line per request) for later audit.

use consensus_domain::ConsensusResult;

/// Port for persisting consensus results.
///
/// `record` is synchronous and non-fallible; a recorder that fails to write
/// logs the failure itself and never disturbs the caller.
pub trait ResultRecorder: Send + Sync {
    /// Record one finished request, tagged with its stage when known.
    fn record(&self, stage: Option<&str>, result: &ConsensusResult);
}

/// No-op implementation for tests and when recording is disabled.
pub struct NoRecorder;

impl ResultRecorder for NoRecorder {
    fn record(&self, _stage: Option<&str>, _result: &ConsensusResult) {}
}
