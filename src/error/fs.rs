//! File system errors

use super::BundleupError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> BundleupError {
    BundleupError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> BundleupError {
    BundleupError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a cache operation failed error
pub fn cache_failed(message: impl Into<String>) -> BundleupError {
    BundleupError::CacheOperationFailed {
        message: message.into(),
    }
}
