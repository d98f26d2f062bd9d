//! High-level operations
//!
//! Each operation wraps one workflow behind a small struct so commands only
//! wire collaborators together:
//! - [`update`]: scoped or full bundle update

pub mod update;
