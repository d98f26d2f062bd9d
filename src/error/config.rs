//! Configuration errors

use super::BundleupError;

/// Creates a manifest not found error
pub fn manifest_not_found(path: impl Into<String>) -> BundleupError {
    BundleupError::ManifestNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> BundleupError {
    BundleupError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> BundleupError {
    BundleupError::ConfigInvalid {
        message: message.into(),
    }
}
