//! Lockfile errors

use super::BundleupError;

/// Creates a lockfile missing error
pub fn missing() -> BundleupError {
    BundleupError::LockfileMissing
}
