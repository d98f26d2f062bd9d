//! Error types and handling for bundleup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`lockfile`]: Lockfile errors
//! - [`gem`]: Gem and group lookup errors
//! - [`config`]: Manifest and settings errors
//! - [`install`]: Installer, plugin and external command errors
//! - [`fs`]: File system errors

pub mod config;
pub mod fs;
pub mod gem;
pub mod install;
pub mod lockfile;

use miette::Diagnostic;
use thiserror::Error;

use crate::common::string_utils::gem_not_found_message;

/// Main error type for bundleup operations
#[derive(Error, Diagnostic, Debug)]
pub enum BundleupError {
    // Lockfile errors
    #[error("This bundle hasn't been installed yet")]
    #[diagnostic(
        code(bundleup::lockfile::missing),
        help(
            "Run 'bundleup update' without gem, group or source arguments to resolve and install every gem first"
        )
    )]
    LockfileMissing,

    // Gem errors
    #[error("{}", gem_not_found_message(.name, .candidates))]
    #[diagnostic(
        code(bundleup::gem::not_found),
        help("Only gems recorded in bundle.lock can be updated by name")
    )]
    GemNotFound {
        name: String,
        candidates: Vec<String>,
    },

    #[error("Group '{group}' is not declared by any gem in the manifest")]
    #[diagnostic(code(bundleup::gem::group_not_found))]
    GroupNotFound { group: String },

    #[error("{message}")]
    #[diagnostic(code(bundleup::cli::invalid_option))]
    InvalidOption { message: String },

    // Configuration errors
    #[error("Could not locate bundle.yaml in {path} or any parent directory")]
    #[diagnostic(
        code(bundleup::config::manifest_not_found),
        help("Run bundleup inside a project, or pass --gemfile <PATH>")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(bundleup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(bundleup::config::invalid))]
    ConfigInvalid { message: String },

    // Runtime errors
    #[error("Your Ruby version is {running}, but bundle.yaml specified {required}")]
    #[diagnostic(
        code(bundleup::runtime::ruby_mismatch),
        help("Switch Ruby versions, or change the ruby entry in bundle.yaml")
    )]
    RubyVersionMismatch { required: String, running: String },

    // Install errors
    #[error("Failed to install gem '{gem}': {reason}")]
    #[diagnostic(code(bundleup::install::failed))]
    InstallFailed { gem: String, reason: String },

    #[error("Failed to install plugin '{plugin}': {reason}")]
    #[diagnostic(code(bundleup::install::plugin_failed))]
    PluginInstallFailed { plugin: String, reason: String },

    #[error("Failed to run '{command}': {reason}")]
    #[diagnostic(
        code(bundleup::install::command_failed),
        help("Make sure Ruby and RubyGems are installed and on PATH")
    )]
    CommandFailed { command: String, reason: String },

    #[error("Failed to lock project: {reason}")]
    #[diagnostic(code(bundleup::install::lock_failed))]
    ProjectLockFailed { reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(bundleup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(bundleup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bundleup::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(bundleup::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl From<std::io::Error> for BundleupError {
    fn from(err: std::io::Error) -> Self {
        BundleupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BundleupError {
    fn from(err: serde_yaml::Error) -> Self {
        BundleupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BundleupError {
    fn from(err: serde_json::Error) -> Self {
        BundleupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BundleupError>;
