//! Manifest (bundle.yaml) main module
//!
//! The manifest declares the gems a project depends on, the groups they
//! belong to, the sources to fetch them from and an optional Ruby version.

pub mod dependency;

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{
    Result,
    config::{invalid, parse_failed},
    fs::read_failed,
};

pub use dependency::{DEFAULT_GROUP, GemDependency};

/// Project manifest from bundle.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Gem sources, in priority order
    #[serde(default)]
    pub sources: Vec<String>,

    /// Exact Ruby version the project runs on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruby: Option<String>,

    /// Plugin gems to bootstrap before updating
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    /// Declared gems
    #[serde(default)]
    pub gems: Vec<GemDependency>,
}

impl Manifest {
    /// Parse manifest from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load and validate the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;
        let manifest: Self = serde_yaml::from_str(&content)
            .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for gem in &self.gems {
            gem.validate()?;
            if !seen.insert(gem.name.as_str()) {
                return Err(invalid(format!(
                    "Gem '{}' is declared more than once",
                    gem.name
                )));
            }
        }
        Ok(())
    }

    /// Find a declared gem by name
    pub fn find_gem(&self, name: &str) -> Option<&GemDependency> {
        self.gems.iter().find(|g| g.name == name)
    }

    /// Every group declared by at least one gem
    pub fn groups(&self) -> BTreeSet<&str> {
        self.gems
            .iter()
            .flat_map(|g| g.groups.iter().map(String::as_str))
            .collect()
    }
}
