//! Output formatting for consensus results

pub mod console;
pub mod formatter;
pub mod markdown;
