//! Gem and group lookup errors

use super::BundleupError;

/// Creates a gem not found error carrying the known gem names for suggestions
pub fn not_found(name: impl Into<String>, candidates: &[String]) -> BundleupError {
    BundleupError::GemNotFound {
        name: name.into(),
        candidates: candidates.to_vec(),
    }
}

/// Creates a group not found error
pub fn group_not_found(group: impl Into<String>) -> BundleupError {
    BundleupError::GroupNotFound {
        group: group.into(),
    }
}

/// Creates an invalid option error
pub fn invalid_option(message: impl Into<String>) -> BundleupError {
    BundleupError::InvalidOption {
        message: message.into(),
    }
}
