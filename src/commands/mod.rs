//! Command implementations for bundleup CLI

pub mod completions;
pub mod update;
pub mod version;
