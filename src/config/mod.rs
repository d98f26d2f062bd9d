//! Configuration file handling for bundleup
//!
//! This module contains data structures for:
//! - `bundle.yaml` - Manifest of declared gems, groups, sources and plugins
//! - `bundle.lock` - Lockfile with previously resolved versions
//! - `.bundle/config` - Layered settings store

pub mod lockfile;
pub mod manifest;
pub mod settings;

// Re-export commonly used types
pub use lockfile::{LockedSpec, Lockfile, LockfileStore};
pub use manifest::{GemDependency, Manifest};
pub use settings::Settings;
