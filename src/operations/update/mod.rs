//! Update operation module
//!
//! Turns an update request into a validated scope and drives the update
//! workflow:
//! - [`request`]: what the user asked for
//! - [`validation`]: lockfile checks for targeted updates
//! - [`groups`]: group to gem name expansion
//! - [`scope`]: full versus partial update resolution
//! - [`options`]: update options and derived install options
//! - [`orchestrator`]: the end-to-end workflow

pub mod groups;
pub mod options;
pub mod orchestrator;
pub mod request;
pub mod scope;
pub mod validation;

pub use options::{InstallOptions, UpdateOptions, adapt};
pub use orchestrator::{UpdateEnv, UpdateOperation};
pub use request::UpdateRequest;
pub use scope::{ResolvedScope, UpdateScope, resolve};
