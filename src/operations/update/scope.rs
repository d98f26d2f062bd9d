//! Update scope resolution
//!
//! Decides between a full update and a partial one, and for partial
//! updates works out exactly which gems may change.

use super::groups::expand;
use super::request::{UpdateRequest, dedup};
use super::validation::validate;
use crate::config::LockfileStore;
use crate::definition::{DefinitionBuilder, Unlock};
use crate::error::Result;

/// Gems and sources a partial update may change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedScope {
    /// Named gems plus gems of the requested groups, each once
    pub names: Vec<String>,
    pub sources: Vec<String>,
    pub groups: Vec<String>,
    pub ruby: bool,
    pub bundler: bool,
}

/// Outcome of scope resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateScope {
    /// Discard every pin and re-resolve the whole bundle
    Full,
    /// Re-resolve only the scoped gems, keeping the rest locked
    Partial(ResolvedScope),
}

impl UpdateScope {
    /// The definition unlock matching this scope
    pub fn into_unlock(self, conservative: bool) -> Unlock {
        match self {
            UpdateScope::Full => Unlock::All,
            UpdateScope::Partial(scope) => Unlock::Scoped {
                names: scope.names,
                sources: scope.sources,
                ruby: scope.ruby,
                bundler: scope.bundler,
                conservative,
            },
        }
    }
}

/// Resolve `request` against the lockfile
///
/// Full updates return without looking at the lockfile. Partial updates are
/// validated first, so no definition is built for an invalid request.
pub fn resolve(
    request: &UpdateRequest,
    store: &dyn LockfileStore,
    definitions: &dyn DefinitionBuilder,
) -> Result<UpdateScope> {
    if request.is_full_update() {
        tracing::debug!("full update requested");
        return Ok(UpdateScope::Full);
    }

    let exists = store.exists();
    let locked_names: Vec<String> = if exists {
        store.locked_specs()?.into_iter().map(|s| s.name).collect()
    } else {
        Vec::new()
    };
    validate(exists, request, &locked_names)?;

    let mut names = request.names.clone();
    if !request.groups.is_empty() {
        let current = definitions.current()?;
        names.extend(expand(&request.groups, &current)?);
    }

    let scope = ResolvedScope {
        names: dedup(names),
        sources: request.sources.clone(),
        groups: request.groups.clone(),
        ruby: request.ruby,
        bundler: request.bundler,
    };
    tracing::debug!(?scope, "partial update scope");
    Ok(UpdateScope::Partial(scope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GemDependency, LockedSpec, Lockfile, Manifest};
    use crate::definition::Definition;
    use crate::error::BundleupError;
    use std::cell::Cell;

    struct MemoryStore {
        lockfile: Option<Lockfile>,
        reads: Cell<usize>,
    }

    impl MemoryStore {
        fn with_names(names: &[&str]) -> Self {
            Self {
                lockfile: Some(Lockfile {
                    specs: names.iter().map(|n| LockedSpec::new(*n, "1.0.0")).collect(),
                    ..Lockfile::default()
                }),
                reads: Cell::new(0),
            }
        }

        fn missing() -> Self {
            Self {
                lockfile: None,
                reads: Cell::new(0),
            }
        }
    }

    impl LockfileStore for MemoryStore {
        fn exists(&self) -> bool {
            self.reads.set(self.reads.get() + 1);
            self.lockfile.is_some()
        }

        fn locked_specs(&self) -> Result<Vec<LockedSpec>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.lockfile.clone().map(|l| l.specs).unwrap_or_default())
        }
    }

    /// Test group `test` holds gem `a`; counts definition builds
    struct CountingBuilder {
        builds: Cell<usize>,
    }

    impl CountingBuilder {
        fn new() -> Self {
            Self { builds: Cell::new(0) }
        }
    }

    impl DefinitionBuilder for CountingBuilder {
        fn current(&self) -> Result<Definition> {
            self.build(Unlock::Nothing)
        }

        fn build(&self, unlock: Unlock) -> Result<Definition> {
            self.builds.set(self.builds.get() + 1);
            let manifest = Manifest {
                gems: vec![
                    GemDependency::new("a").in_groups(&["test"]),
                    GemDependency::new("b"),
                ],
                ..Manifest::default()
            };
            let lockfile = Lockfile {
                specs: vec![LockedSpec::new("a", "1.0.0"), LockedSpec::new("b", "1.0.0")],
                ..Lockfile::default()
            };
            Ok(Definition::new(manifest, Some(lockfile), unlock, None))
        }
    }

    fn request(names: &[&str], groups: &[&str]) -> UpdateRequest {
        UpdateRequest {
            names: names.iter().map(|n| (*n).to_string()).collect(),
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
            ..UpdateRequest::default()
        }
    }

    #[test]
    fn test_full_update_skips_lockfile() {
        let store = MemoryStore::missing();
        let builder = CountingBuilder::new();

        let scope = resolve(&UpdateRequest::default(), &store, &builder).unwrap();

        assert_eq!(scope, UpdateScope::Full);
        assert_eq!(store.reads.get(), 0);
        assert_eq!(builder.builds.get(), 0);
    }

    #[test]
    fn test_missing_lockfile_fails_before_any_build() {
        let builder = CountingBuilder::new();
        let err = resolve(&request(&[], &["test"]), &MemoryStore::missing(), &builder).unwrap_err();

        assert!(matches!(err, BundleupError::LockfileMissing));
        assert_eq!(builder.builds.get(), 0);
    }

    #[test]
    fn test_unknown_gem() {
        let store = MemoryStore::with_names(&["a", "b", "c"]);
        let err = resolve(&request(&["b", "z"], &[]), &store, &CountingBuilder::new()).unwrap_err();
        assert!(matches!(err, BundleupError::GemNotFound { name, .. } if name == "z"));
    }

    #[test]
    fn test_group_names_merge_with_explicit_names() {
        let store = MemoryStore::with_names(&["a", "b"]);
        let scope = resolve(&request(&["b"], &["test"]), &store, &CountingBuilder::new()).unwrap();

        let UpdateScope::Partial(scope) = scope else {
            panic!("expected partial scope");
        };
        assert_eq!(scope.names, vec!["b", "a"]);
        assert_eq!(scope.groups, vec!["test"]);
    }

    #[test]
    fn test_expanding_group_twice_is_idempotent() {
        let store = MemoryStore::with_names(&["a", "b"]);
        let once = resolve(&request(&[], &["test"]), &store, &CountingBuilder::new()).unwrap();
        let twice = resolve(
            &UpdateRequest {
                groups: vec!["test".to_string(), "test".to_string()],
                ..UpdateRequest::default()
            },
            &store,
            &CountingBuilder::new(),
        )
        .unwrap();

        let (UpdateScope::Partial(once), UpdateScope::Partial(twice)) = (once, twice) else {
            panic!("expected partial scopes");
        };
        assert_eq!(once.names, twice.names);
        assert_eq!(once.names, vec!["a"]);
    }

    #[test]
    fn test_into_unlock() {
        assert_eq!(UpdateScope::Full.into_unlock(true), Unlock::All);

        let scope = UpdateScope::Partial(ResolvedScope {
            names: vec!["rack".to_string()],
            ruby: true,
            ..ResolvedScope::default()
        });
        assert_eq!(
            scope.into_unlock(true),
            Unlock::Scoped {
                names: vec!["rack".to_string()],
                sources: Vec::new(),
                ruby: true,
                bundler: false,
                conservative: true,
            }
        );
    }
}
