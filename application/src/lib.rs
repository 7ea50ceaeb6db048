//! Application layer for paper-consensus
//!
//! This crate contains the consensus use cases and the ports they drive.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    llm_provider::{LlmProvider, ProviderError},
    progress::{ConsensusProgress, NoProgress},
    result_recorder::{NoRecorder, ResultRecorder},
};
pub use use_cases::fan_out::{FanOutLimits, RunOutcome, run_all, run_n_times};
pub use use_cases::run_consensus::{
    ConsensusRequest, DEFAULT_SYSTEM_PROMPT, RunConsensusUseCase, build_user_prompt,
    run_consensus,
};
