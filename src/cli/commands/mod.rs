//! Command implementations for the kwfreq CLI.

pub mod count;
pub mod version;
