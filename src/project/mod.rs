//! Project detection and locking
//!
//! ## Project Structure
//!
//! ```text
//! app/
//! ├── bundle.yaml           # Manifest
//! ├── bundle.lock           # Resolved versions
//! ├── vendor/cache/         # Optional package cache
//! └── .bundle/
//!     ├── config            # Local settings
//!     ├── plugin/           # Plugin gems
//!     └── .lock             # Advisory lock file
//! ```

use std::path::{Path, PathBuf};

use fslock::LockFile;

use crate::config::settings::SETTINGS_DIR;
use crate::config::{LockedSpec, Lockfile, LockfileStore, Manifest};
use crate::error::{BundleupError, Result, config::manifest_not_found};

/// Manifest filename
pub const MANIFEST_FILE: &str = "bundle.yaml";

/// Lockfile filename
pub const LOCKFILE_NAME: &str = "bundle.lock";

/// Lock file for serializing installs
pub const LOCK_FILE: &str = ".lock";

/// Plugin install directory inside the settings directory
pub const PLUGIN_DIR: &str = "plugin";

/// Local package cache directory
pub const APP_CACHE_DIR: &str = "vendor/cache";

/// A bundleup project: a manifest and the files that live next to it
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing the manifest
    pub root: PathBuf,

    /// Path to `bundle.yaml`
    pub manifest_path: PathBuf,

    /// Path to `bundle.lock`
    pub lockfile_path: PathBuf,
}

/// RAII guard for the project lock
///
/// Acquires an advisory file lock on creation and releases it on drop.
#[derive(Debug)]
pub struct ProjectGuard {
    lock: LockFile,
}

impl Project {
    /// Find a project by searching upward from `start` for a manifest
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(MANIFEST_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Open the project whose manifest is at `manifest_path`
    pub fn from_manifest(manifest_path: &Path) -> Result<Self> {
        if !manifest_path.is_file() {
            return Err(manifest_not_found(manifest_path.display().to_string()));
        }

        let manifest_path = dunce::canonicalize(manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| manifest_not_found(manifest_path.display().to_string()))?;
        let lockfile_path = root.join(LOCKFILE_NAME);

        Ok(Self {
            root,
            manifest_path,
            lockfile_path,
        })
    }

    /// Resolve the project from an explicit manifest path or by searching from `cwd`
    pub fn locate(gemfile: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = gemfile {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            return Self::from_manifest(&path);
        }

        let root = Self::find_from(cwd).ok_or_else(|| manifest_not_found(cwd.display().to_string()))?;
        Self::from_manifest(&root.join(MANIFEST_FILE))
    }

    /// Load the manifest
    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.manifest_path)
    }

    /// Load the lockfile, or `None` when the bundle was never locked
    pub fn lockfile(&self) -> Result<Option<Lockfile>> {
        if self.lockfile_path.is_file() {
            Lockfile::load(&self.lockfile_path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// `.bundle` directory
    pub fn settings_dir(&self) -> PathBuf {
        self.root.join(SETTINGS_DIR)
    }

    /// Plugin install directory
    pub fn plugin_dir(&self) -> PathBuf {
        self.settings_dir().join(PLUGIN_DIR)
    }

    /// `vendor/cache`
    pub fn app_cache_dir(&self) -> PathBuf {
        self.root.join(APP_CACHE_DIR)
    }

    /// Acquire the project lock, blocking until it is free
    pub fn lock(&self) -> Result<ProjectGuard> {
        ProjectGuard::acquire(&self.settings_dir())
    }
}

impl LockfileStore for Project {
    fn exists(&self) -> bool {
        self.lockfile_path.is_file()
    }

    fn locked_specs(&self) -> Result<Vec<LockedSpec>> {
        Ok(self.lockfile()?.map(|lock| lock.specs).unwrap_or_default())
    }
}

impl ProjectGuard {
    /// Acquire a lock on `settings_dir`, creating the directory when needed
    pub fn acquire(settings_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(settings_dir)?;
        let lock_path = settings_dir.join(LOCK_FILE);

        let mut lock = LockFile::open(&lock_path).map_err(|e| BundleupError::ProjectLockFailed {
            reason: format!("Failed to open lock file: {e}"),
        })?;

        tracing::debug!(path = %lock_path.display(), "waiting for project lock");
        lock.lock().map_err(|e| BundleupError::ProjectLockFailed {
            reason: e.to_string(),
        })?;

        Ok(Self { lock })
    }
}

impl Drop for ProjectGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}
