//! Lockfile checks for targeted updates

use super::request::UpdateRequest;
use crate::error::{Result, gem, lockfile};

/// Check that a targeted update has a lockfile and that every named gem is locked
///
/// Full updates target nothing and always pass. The first unknown name is
/// reported together with every locked name for suggestions.
pub fn validate(lockfile_exists: bool, request: &UpdateRequest, locked_names: &[String]) -> Result<()> {
    if request.is_full_update() {
        return Ok(());
    }

    if !lockfile_exists {
        return Err(lockfile::missing());
    }

    if let Some(unknown) = request.names.iter().find(|name| !locked_names.contains(name)) {
        return Err(gem::not_found(unknown.clone(), locked_names));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleupError;

    fn locked(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn named(names: &[&str]) -> UpdateRequest {
        UpdateRequest {
            names: locked(names),
            ..UpdateRequest::default()
        }
    }

    #[test]
    fn test_full_update_needs_nothing() {
        assert!(validate(false, &UpdateRequest::default(), &[]).is_ok());
    }

    #[test]
    fn test_targeted_update_requires_lockfile() {
        let err = validate(false, &named(&["rack"]), &[]).unwrap_err();
        assert!(matches!(err, BundleupError::LockfileMissing));

        let ruby_only = UpdateRequest {
            ruby: true,
            ..UpdateRequest::default()
        };
        let err = validate(false, &ruby_only, &[]).unwrap_err();
        assert!(matches!(err, BundleupError::LockfileMissing));
    }

    #[test]
    fn test_unknown_gem_reports_first_unmatched_name() {
        let err = validate(true, &named(&["b", "z", "y"]), &locked(&["a", "b", "c"])).unwrap_err();
        match err {
            BundleupError::GemNotFound { name, candidates } => {
                assert_eq!(name, "z");
                assert_eq!(candidates, vec!["a", "b", "c"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_locked_names_pass() {
        assert!(validate(true, &named(&["a", "c"]), &locked(&["a", "b", "c"])).is_ok());
    }
}
