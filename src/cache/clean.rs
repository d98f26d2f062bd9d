//! Removal of gems the lockfile no longer references

use std::collections::BTreeSet;

use walkdir::WalkDir;

use crate::common::fs::remove_path;
use crate::common::string_utils::split_full_name;
use crate::error::{Result, fs::cache_failed};
use crate::installer::InstallReport;
use crate::operations::update::UpdateOptions;
use crate::ui::Ui;

/// Subdirectories of a gem home holding one entry per installed gem
const GEM_DIRS: &[(&str, &str)] = &[("gems", ""), ("specifications", ".gemspec"), ("cache", ".gem")];

/// Removes unused gems after an update
pub trait Cleaner {
    fn clean(&self, options: &UpdateOptions, report: &InstallReport) -> Result<()>;
}

/// Cleans the configured install path
pub struct GemCleaner<'a> {
    ui: &'a dyn Ui,
}

impl<'a> GemCleaner<'a> {
    pub fn new(ui: &'a dyn Ui) -> Self {
        Self { ui }
    }
}

impl Cleaner for GemCleaner<'_> {
    fn clean(&self, options: &UpdateOptions, report: &InstallReport) -> Result<()> {
        let keep: BTreeSet<String> = report.lockfile.specs.iter().map(|s| s.full_name()).collect();
        let mut removed = BTreeSet::new();

        for &(dir, suffix) in GEM_DIRS {
            let dir = report.gem_home.join(dir);
            if !dir.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
                let entry = entry.map_err(|e| cache_failed(e.to_string()))?;
                let file_name = entry.file_name().to_string_lossy().to_string();
                let Some(full_name) = file_name.strip_suffix(suffix) else {
                    continue;
                };
                if is_kept(full_name, &keep) {
                    continue;
                }

                remove_path(entry.path())
                    .map_err(|e| cache_failed(format!("removing {}: {e}", entry.path().display())))?;
                removed.insert(full_name.to_string());
            }
        }

        if !options.quiet {
            for full_name in &removed {
                let message = match split_full_name(full_name) {
                    Some((name, version)) => format!("Removing {name} ({version})"),
                    None => format!("Removing {full_name}"),
                };
                self.ui.info(&message);
            }
        }
        tracing::debug!(removed = removed.len(), "cleaned install path");
        Ok(())
    }
}

/// Kept when it names a locked gem, platform suffix allowed
fn is_kept(full_name: &str, keep: &BTreeSet<String>) -> bool {
    keep.contains(full_name)
        || keep
            .iter()
            .any(|kept| full_name.strip_prefix(kept.as_str()).is_some_and(|rest| rest.starts_with('-')))
}
