//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod fan_out;
pub mod run_consensus;
