//! Installer, plugin and external command errors

use super::BundleupError;

/// Creates an install failed error
pub fn failed(gem: impl Into<String>, reason: impl Into<String>) -> BundleupError {
    BundleupError::InstallFailed {
        gem: gem.into(),
        reason: reason.into(),
    }
}

/// Creates a plugin install failed error
pub fn plugin_failed(plugin: impl Into<String>, reason: impl Into<String>) -> BundleupError {
    BundleupError::PluginInstallFailed {
        plugin: plugin.into(),
        reason: reason.into(),
    }
}

/// Creates a command failed error
pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> BundleupError {
    BundleupError::CommandFailed {
        command: command.into(),
        reason: reason.into(),
    }
}
