//! Update request built from user input

use super::options::UpdateOptions;

/// What the user asked to update
///
/// Built once per invocation and never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Gem names given on the command line, first appearance order
    pub names: Vec<String>,
    pub sources: Vec<String>,
    pub groups: Vec<String>,
    /// Re-record the Ruby version
    pub ruby: bool,
    /// Re-record the bundleup version
    pub bundler: bool,
}

impl UpdateRequest {
    pub fn new(gems: Vec<String>, options: &UpdateOptions) -> Self {
        Self {
            names: dedup(gems),
            sources: dedup(options.sources.clone()),
            groups: dedup(options.groups.clone()),
            ruby: options.ruby,
            bundler: options.bundler,
        }
    }

    /// True when nothing in particular was named, so every gem is re-resolved
    pub fn is_full_update(&self) -> bool {
        self.names.is_empty()
            && self.sources.is_empty()
            && self.groups.is_empty()
            && !self.ruby
            && !self.bundler
    }
}

/// Drop repeated entries, keeping the first
pub(crate) fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
