//! Logging infrastructure: structured result recording.
//!
//! Provides [`JsonlResultRecorder`], a JSONL file writer that implements
//! the [`ResultRecorder`](consensus_application::ResultRecorder) port.

mod jsonl_recorder;

pub use jsonl_recorder::JsonlResultRecorder;
