//! Local package cache (`vendor/cache`)
//!
//! When a project keeps a `vendor/cache` directory, every update refreshes
//! it so it holds exactly the `.gem` files of the locked bundle.

pub mod clean;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, fs::cache_failed};
use crate::installer::InstallReport;

pub use clean::{Cleaner, GemCleaner};

/// Package cache kept next to the project
pub trait AppCache {
    /// Whether the project keeps a cache
    fn exists(&self) -> bool;

    /// Bring the cache in line with the installed bundle
    fn refresh(&self, report: &InstallReport) -> Result<()>;
}

/// `vendor/cache` filled from the gem home's download cache
#[derive(Debug, Clone)]
pub struct VendorCache {
    dir: PathBuf,
}

impl VendorCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn copy_gem(&self, home: &Path, file_name: &str) -> Result<bool> {
        let target = self.dir.join(file_name);
        if target.is_file() {
            return Ok(false);
        }

        let source = home.join("cache").join(file_name);
        if !source.is_file() {
            tracing::warn!(gem = %file_name, "gem missing from download cache");
            return Ok(false);
        }

        std::fs::copy(&source, &target)
            .map_err(|e| cache_failed(format!("copying {file_name}: {e}")))?;
        Ok(true)
    }
}

impl AppCache for VendorCache {
    fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    fn refresh(&self, report: &InstallReport) -> Result<()> {
        let expected: BTreeSet<String> = report
            .lockfile
            .specs
            .iter()
            .map(|spec| format!("{}.gem", spec.full_name()))
            .collect();

        let mut copied = 0;
        for file_name in &expected {
            if self.copy_gem(&report.gem_home, file_name)? {
                copied += 1;
            }
        }

        let mut pruned = 0;
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| cache_failed(e.to_string()))?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().is_file()
                && file_name.ends_with(".gem")
                && !expected.contains(&file_name)
            {
                std::fs::remove_file(entry.path())
                    .map_err(|e| cache_failed(format!("removing {file_name}: {e}")))?;
                pruned += 1;
            }
        }

        tracing::debug!(dir = %self.dir.display(), copied, pruned, "refreshed package cache");
        Ok(())
    }
}
