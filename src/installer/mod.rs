//! Gem installation
//!
//! This module handles:
//! - Installing the gems of a definition through RubyGems, see [`gem`]
//! - Bootstrapping manifest plugins, see [`plugins`]
//! - Locating the gem home
//!
//! Downloading and building gems is delegated to the `gem` command.

pub mod gem;
pub mod plugins;

use std::path::{Path, PathBuf};

use crate::command::CommandRunner;
use crate::common::string_utils::split_full_name;
use crate::config::{LockedSpec, Lockfile, Settings};
use crate::definition::Definition;
use crate::error::{Result, install::command_failed};
use crate::fetcher::Fetcher;
use crate::operations::update::InstallOptions;
use crate::project::Project;

pub use gem::GemInstaller;
pub use plugins::{GemPluginInstaller, PluginInstaller};

/// Everything an install needs besides the definition
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    pub project: &'a Project,
    pub options: &'a InstallOptions,
    pub settings: &'a Settings,
    pub fetcher: &'a Fetcher,
}

/// Result of an install
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Directory gems were installed into
    pub gem_home: PathBuf,
    /// Gems `gem install` reported, including pulled-in dependencies
    pub installed: Vec<LockedSpec>,
    /// Pinned gems that were already present
    pub skipped: Vec<String>,
    /// Lockfile written after the install
    pub lockfile: Lockfile,
}

/// Installs a definition into the project's gem home
pub trait Installer {
    /// Install every gem of `definition` and write the lockfile
    ///
    /// Fails on the first gem that cannot be installed; the lockfile is
    /// then left untouched.
    fn install(&self, definition: &mut Definition, request: &InstallRequest<'_>) -> Result<InstallReport>;
}

/// Directory gems are installed into: the `path` setting, else RubyGems' own
pub fn gem_home(runner: &dyn CommandRunner, settings: &Settings, root: &Path) -> Result<PathBuf> {
    if let Some(path) = settings.install_path(root) {
        return Ok(path);
    }

    let args = ["env".to_string(), "gemdir".to_string()];
    let output = runner.run("gem", &args, root)?;
    let dir = output.stdout.trim();
    if !output.success || dir.is_empty() {
        return Err(command_failed("gem env gemdir", output.failure_reason()));
    }
    Ok(PathBuf::from(dir))
}

/// Specification file for `name` at `version` in `home`, platform gems included
pub fn spec_file(home: &Path, name: &str, version: &str) -> Option<PathBuf> {
    let full_name = format!("{name}-{version}");
    let specifications = home.join("specifications");
    let exact = specifications.join(format!("{full_name}.gemspec"));
    if exact.is_file() {
        return Some(exact);
    }

    // NAME-VERSION-PLATFORM.gemspec
    let prefix = format!("{full_name}-");
    std::fs::read_dir(&specifications)
        .ok()?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .map(|f| f.to_string_lossy())
                .is_some_and(|f| f.starts_with(&prefix) && f.ends_with(".gemspec"))
        })
}

/// Highest version of `name` with a specification in `home`
pub fn installed_version(home: &Path, name: &str) -> Option<String> {
    std::fs::read_dir(home.join("specifications"))
        .ok()?
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let full_name = file_name.strip_suffix(".gemspec")?.to_string();
            let (found, version) = split_full_name(&full_name)?;
            (found == name).then(|| version.to_string())
        })
        .max_by_key(|version| version_key(version))
}

/// Numeric segments for ordering versions: `2.7.10` sorts after `2.7.9`
fn version_key(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map_while(|segment| segment.parse::<u64>().ok())
        .collect()
}

/// Whether `home` has a specification for `name` at `version`
pub fn is_installed(home: &Path, name: &str, version: &str) -> bool {
    spec_file(home, name, version).is_some()
}
