//! `LockedSpec` struct for the lockfile
//!
//! A resolved gem in bundle.lock.

use serde::{Deserialize, Serialize};

/// A resolved gem in the lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedSpec {
    /// Gem name
    pub name: String,

    /// Exact resolved version
    pub version: String,

    /// Source the gem was fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Names of the gem's runtime dependencies
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl LockedSpec {
    /// Create a spec with no source and no dependencies
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: None,
            dependencies: Vec::new(),
        }
    }

    /// Builder-style dependency setter
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: &[&str]) -> Self {
        self.dependencies = dependencies.iter().map(|d| (*d).to_string()).collect();
        self
    }

    /// Builder-style source setter
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Directory name RubyGems uses for this spec: `name-version`
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}
