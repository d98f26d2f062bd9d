//! Resolved bundle definition
//!
//! A [`Definition`] combines the manifest, the previous lockfile and an
//! [`Unlock`] describing which gems may move. Version selection itself is
//! left to RubyGems: the definition only decides which gems are pinned to
//! their locked version and which are free within requirement bounds.

pub mod promoter;
pub mod runtime;

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::command::CommandRunner;
use crate::config::{LockedSpec, Lockfile, Manifest};
use crate::error::{BundleupError, Result, gem::group_not_found};
use crate::project::Project;

pub use promoter::{Level, VersionPromoter};

/// Which locked gems a definition is allowed to change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Unlock {
    /// Everything stays at its locked version
    #[default]
    Nothing,
    /// Every gem is re-resolved, as if there were no lockfile
    All,
    /// Only the named gems and gems from the named sources move
    Scoped {
        names: Vec<String>,
        sources: Vec<String>,
        ruby: bool,
        bundler: bool,
        /// Keep dependencies of unlocked gems pinned
        conservative: bool,
    },
}

/// One gem the installer has to provide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGem {
    pub name: String,
    /// Version in the previous lockfile
    pub locked_version: Option<String>,
    /// Pinned gems must be installed at exactly `locked_version`
    pub pinned: bool,
    /// Requirement fragments for unlocked gems
    pub requirements: Vec<String>,
    pub source: Option<String>,
}

impl PlannedGem {
    /// Value for `gem install --version`, if any
    pub fn version_requirement(&self) -> Option<String> {
        if self.pinned {
            return self.locked_version.as_ref().map(|v| format!("= {v}"));
        }
        (!self.requirements.is_empty()).then(|| self.requirements.join(", "))
    }
}

/// Builds definitions for a project
pub trait DefinitionBuilder {
    /// The definition as currently locked, with nothing unlocked
    fn current(&self) -> Result<Definition>;

    /// A definition with the given gems unlocked
    fn build(&self, unlock: Unlock) -> Result<Definition>;
}

/// Computed view of what the bundle should contain
#[derive(Debug, Clone)]
pub struct Definition {
    manifest: Manifest,
    locked: Lockfile,
    unlock: Unlock,
    runtime_ruby: Option<String>,
    promoter: VersionPromoter,
    installed: BTreeMap<String, LockedSpec>,
}

impl Definition {
    pub fn new(
        manifest: Manifest,
        locked: Option<Lockfile>,
        unlock: Unlock,
        runtime_ruby: Option<String>,
    ) -> Self {
        Self {
            manifest,
            locked: locked.unwrap_or_default(),
            unlock,
            runtime_ruby,
            promoter: VersionPromoter::default(),
            installed: BTreeMap::new(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn promoter(&self) -> VersionPromoter {
        self.promoter
    }

    pub fn set_promoter(&mut self, promoter: VersionPromoter) {
        self.promoter = promoter;
    }

    /// Whether the previous lockfile recorded `name`
    pub fn is_locked(&self, name: &str) -> bool {
        self.locked.find_spec(name).is_some()
    }

    /// Names of the gems belonging to any of `groups`, with their locked dependencies
    ///
    /// Manifest order, each name once. A group no manifest gem declares is
    /// an error.
    pub fn specs_for_groups(&self, groups: &[String]) -> Result<Vec<String>> {
        let declared = self.manifest.groups();
        if let Some(unknown) = groups.iter().find(|g| !declared.contains(g.as_str())) {
            return Err(group_not_found(unknown.clone()));
        }

        let roots = self
            .manifest
            .gems
            .iter()
            .filter(|gem| gem.in_any_group(groups))
            .map(|gem| gem.name.as_str());
        Ok(self.locked.dependency_closure(roots))
    }

    /// Every gem this definition allows to change version
    pub fn unlocked_names(&self) -> BTreeSet<String> {
        match &self.unlock {
            Unlock::Nothing => BTreeSet::new(),
            Unlock::All => self
                .locked
                .specs
                .iter()
                .map(|s| s.name.clone())
                .chain(self.manifest.gems.iter().map(|g| g.name.clone()))
                .collect(),
            Unlock::Scoped {
                names,
                sources,
                conservative,
                ..
            } => {
                let from_sources = self
                    .locked
                    .specs
                    .iter()
                    .filter(|s| s.source.as_ref().is_some_and(|src| sources.contains(src)))
                    .map(|s| s.name.as_str())
                    .chain(
                        self.manifest
                            .gems
                            .iter()
                            .filter(|g| g.source.as_ref().is_some_and(|src| sources.contains(src)))
                            .map(|g| g.name.as_str()),
                    );
                let roots: Vec<&str> = names.iter().map(String::as_str).chain(from_sources).collect();

                if *conservative {
                    roots.into_iter().map(str::to_string).collect()
                } else {
                    self.locked.dependency_closure(roots).into_iter().collect()
                }
            }
        }
    }

    /// Gems to install for every group not in `without`
    pub fn install_plan(&self, without: &[String]) -> Vec<PlannedGem> {
        let unlocked = self.unlocked_names();
        let roots = self
            .manifest
            .gems
            .iter()
            .filter(|gem| !gem.is_excluded_by(without))
            .map(|gem| gem.name.as_str());

        self.locked
            .dependency_closure(roots)
            .into_iter()
            .map(|name| {
                let locked = self.locked.find_spec(&name);
                let declared = self.manifest.find_gem(&name);
                let pinned = locked.is_some() && !unlocked.contains(&name);

                let mut requirements = Vec::new();
                if !pinned {
                    if let Some(requirement) = declared.and_then(|g| g.requirement.clone()) {
                        requirements.push(requirement);
                    }
                    if let Some(spec) = locked {
                        requirements.extend(self.promoter.bounds(&spec.version));
                    }
                }

                PlannedGem {
                    locked_version: locked.map(|s| s.version.clone()),
                    pinned,
                    requirements,
                    source: declared
                        .and_then(|g| g.source.clone())
                        .or_else(|| locked.and_then(|s| s.source.clone())),
                    name,
                }
            })
            .collect()
    }

    /// Check the running Ruby against the manifest's `ruby` entry
    pub fn validate_runtime(&self) -> Result<()> {
        let Some(required) = &self.manifest.ruby else {
            return Ok(());
        };

        match &self.runtime_ruby {
            Some(running) if running != required => Err(BundleupError::RubyVersionMismatch {
                required: required.clone(),
                running: running.clone(),
            }),
            Some(_) => Ok(()),
            None => {
                tracing::warn!(required = %required, "skipping ruby version check");
                Ok(())
            }
        }
    }

    /// Record a gem the installer actually installed
    pub fn record_installed(&mut self, spec: LockedSpec) {
        self.installed.insert(spec.name.clone(), spec);
    }

    /// The lockfile describing this definition after installation
    ///
    /// Installed specs replace locked ones; only specs reachable from the
    /// manifest are kept.
    pub fn to_lockfile(&self) -> Lockfile {
        let mut specs: BTreeMap<String, LockedSpec> = self
            .locked
            .specs
            .iter()
            .map(|s| (s.name.clone(), s.clone()))
            .collect();
        specs.extend(self.installed.clone());

        let merged = Lockfile {
            specs: specs.into_values().collect(),
            ..Lockfile::default()
        };
        let reachable = merged.dependency_closure(self.manifest.gems.iter().map(|g| g.name.as_str()));
        let specs = reachable
            .iter()
            .filter_map(|name| merged.find_spec(name).cloned())
            .collect();

        let (refresh_ruby, refresh_bundler) = match &self.unlock {
            Unlock::All => (true, true),
            Unlock::Scoped { ruby, bundler, .. } => (*ruby, *bundler),
            Unlock::Nothing => (false, false),
        };

        let ruby_version = if refresh_ruby || self.locked.ruby_version.is_none() {
            self.runtime_ruby
                .clone()
                .or_else(|| self.manifest.ruby.clone())
                .or_else(|| self.locked.ruby_version.clone())
        } else {
            self.locked.ruby_version.clone()
        };
        let bundled_with = if refresh_bundler || self.locked.bundled_with.is_none() {
            Some(env!("CARGO_PKG_VERSION").to_string())
        } else {
            self.locked.bundled_with.clone()
        };

        Lockfile {
            sources: self.manifest.sources.clone(),
            specs,
            dependencies: self.manifest.gems.iter().map(|g| g.name.clone()).collect(),
            ruby_version,
            bundled_with,
        }
    }

    /// Write [`Definition::to_lockfile`] to `path`
    pub fn lock(&self, path: &Path) -> Result<Lockfile> {
        let lockfile = self.to_lockfile();
        tracing::debug!(specs = lockfile.specs.len(), path = %path.display(), "writing lockfile");
        lockfile.save(path)?;
        Ok(lockfile)
    }
}

/// [`DefinitionBuilder`] reading a project's manifest and lockfile
pub struct ProjectDefinitions<'a> {
    project: &'a Project,
    runner: &'a dyn CommandRunner,
    runtime_ruby: OnceCell<Option<String>>,
}

impl<'a> ProjectDefinitions<'a> {
    pub fn new(project: &'a Project, runner: &'a dyn CommandRunner) -> Self {
        Self {
            project,
            runner,
            runtime_ruby: OnceCell::new(),
        }
    }

    fn runtime_ruby(&self) -> Option<String> {
        self.runtime_ruby
            .get_or_init(|| runtime::detect_ruby_version(self.runner, &self.project.root))
            .clone()
    }
}

impl DefinitionBuilder for ProjectDefinitions<'_> {
    fn current(&self) -> Result<Definition> {
        self.build(Unlock::Nothing)
    }

    fn build(&self, unlock: Unlock) -> Result<Definition> {
        let manifest = self.project.manifest()?;
        manifest.validate()?;
        let locked = self.project.lockfile()?;
        tracing::debug!(?unlock, locked = locked.is_some(), "building definition");

        Ok(Definition::new(manifest, locked, unlock, self.runtime_ruby()))
    }
}
