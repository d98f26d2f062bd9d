//! `GemDependency` struct for the manifest
//!
//! A gem declaration in bundle.yaml

use serde::{Deserialize, Serialize};

use crate::error::{Result, config::invalid};

/// Group every gem belongs to unless the manifest says otherwise
pub const DEFAULT_GROUP: &str = "default";

fn default_groups() -> Vec<String> {
    vec![DEFAULT_GROUP.to_string()]
}

/// A gem declaration in bundle.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemDependency {
    /// Gem name
    pub name: String,

    /// Version requirement in RubyGems syntax (e.g. "~> 3.0", ">= 1.2, < 2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,

    /// Groups this gem belongs to
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    /// Source the gem must come from, overriding the manifest sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl GemDependency {
    /// Create a dependency in the default group with no requirement
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirement: None,
            groups: default_groups(),
            source: None,
        }
    }

    /// Builder-style requirement setter
    #[must_use]
    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    /// Builder-style group setter, replacing the default group
    #[must_use]
    pub fn in_groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(|g| (*g).to_string()).collect();
        self
    }

    /// Fetch the gem from `source` instead of the manifest-wide sources
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the gem belongs to any of `groups`
    pub fn in_any_group(&self, groups: &[String]) -> bool {
        self.groups.iter().any(|g| groups.contains(g))
    }

    /// Whether every group of the gem is in `excluded`
    ///
    /// Such a gem is skipped when installing with `without` set.
    pub fn is_excluded_by(&self, excluded: &[String]) -> bool {
        !excluded.is_empty() && self.groups.iter().all(|g| excluded.contains(g))
    }

    /// Validate dependency
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("Gem name cannot be empty"));
        }

        if self.groups.iter().any(|g| g.trim().is_empty()) {
            return Err(invalid(format!(
                "Gem '{}' declares an empty group name",
                self.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_default_group() {
        let dep: GemDependency = serde_yaml::from_str("name: rack\n").unwrap();
        assert_eq!(dep.groups, vec!["default".to_string()]);
        assert!(dep.requirement.is_none());
    }

    #[test]
    fn test_group_membership() {
        let dep = GemDependency::new("rspec").in_groups(&["development", "test"]);
        assert!(dep.in_any_group(&["test".to_string()]));
        assert!(!dep.in_any_group(&["default".to_string()]));
    }

    #[test]
    fn test_is_excluded_only_when_all_groups_excluded() {
        let dep = GemDependency::new("pry").in_groups(&["development", "test"]);
        assert!(!dep.is_excluded_by(&[]));
        assert!(!dep.is_excluded_by(&["test".to_string()]));
        assert!(dep.is_excluded_by(&["test".to_string(), "development".to_string()]));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let dep = GemDependency::new(" ");
        assert!(dep.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let dep = GemDependency::new("rack").in_groups(&[""]);
        assert!(dep.validate().is_err());
    }
}
