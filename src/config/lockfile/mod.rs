//! Lockfile (bundle.lock) main module
//!
//! The lockfile records the exact versions a previous install resolved,
//! together with the runtime dependency edges between them.

pub mod spec;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::fs::write_atomic;
use crate::error::{
    Result,
    config::parse_failed,
    fs::read_failed,
};

pub use spec::LockedSpec;

/// Read access to the previously recorded lockfile
pub trait LockfileStore {
    /// Whether a lockfile has been written for the project
    fn exists(&self) -> bool;

    /// Specs recorded in the lockfile
    fn locked_specs(&self) -> Result<Vec<LockedSpec>>;
}

/// Lockfile structure (bundle.lock)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Sources the specs were resolved against
    #[serde(default)]
    pub sources: Vec<String>,

    /// Resolved gems
    #[serde(default)]
    pub specs: Vec<LockedSpec>,

    /// Names of the gems the manifest declared at lock time
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Ruby version the bundle was locked with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruby_version: Option<String>,

    /// bundleup version that wrote the lockfile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundled_with: Option<String>,
}

impl Lockfile {
    /// Parse lockfile from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| parse_failed("bundle.lock", e.to_string()))
    }

    /// Serialize lockfile to pretty JSON with specs and dependency lists sorted
    pub fn to_json(&self) -> Result<String> {
        let mut normalized = self.clone();
        normalized.specs.sort_by(|a, b| a.name.cmp(&b.name));
        for spec in &mut normalized.specs {
            spec.dependencies.sort();
            spec.dependencies.dedup();
        }
        normalized.dependencies.sort();
        normalized.dependencies.dedup();

        let mut json = serde_json::to_string_pretty(&normalized)
            .map_err(|e| parse_failed("bundle.lock", e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    /// Load the lockfile at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Write the lockfile to `path` atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_json()?)
    }

    /// Find a locked spec by name
    pub fn find_spec(&self, name: &str) -> Option<&LockedSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// `roots` followed by every locked spec reachable through dependency edges
    ///
    /// Depth-first, in the order edges are recorded, each name once. Roots
    /// are kept even when they are not locked; names only reached through
    /// edges are kept only when they are locked.
    pub fn dependency_closure<'a, I>(&self, roots: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for root in roots {
            self.visit(root, &mut seen, &mut ordered);
        }

        ordered
    }

    fn visit(&self, name: &str, seen: &mut HashSet<String>, ordered: &mut Vec<String>) {
        if !seen.insert(name.to_string()) {
            return;
        }
        ordered.push(name.to_string());

        if let Some(spec) = self.find_spec(name) {
            for dependency in &spec.dependencies {
                if self.find_spec(dependency).is_some() {
                    self.visit(dependency, seen, ordered);
                }
            }
        }
    }
}
