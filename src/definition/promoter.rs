//! Version promotion policy
//!
//! Governs how far an unlocked gem may move from its locked version.

use crate::error::{Result, gem::invalid_option};

/// Largest version segment an unlocked gem may bump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Level {
    #[default]
    Major,
    Minor,
    Patch,
}

impl Level {
    /// Pick the level from the mutually exclusive `--major/--minor/--patch` flags
    pub fn from_flags(major: bool, minor: bool, patch: bool) -> Result<Self> {
        match (major, minor, patch) {
            (_, false, false) => Ok(Level::Major),
            (false, true, false) => Ok(Level::Minor),
            (false, false, true) => Ok(Level::Patch),
            _ => Err(invalid_option(
                "Provide only one of the following options: --major, --minor, --patch",
            )),
        }
    }
}

/// Requirement bounds applied to unlocked gems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionPromoter {
    pub level: Level,
    /// Never resolve below the locked version
    pub strict: bool,
    /// Allow prerelease versions
    pub pre: bool,
}

impl VersionPromoter {
    pub fn new(level: Level, strict: bool, pre: bool) -> Self {
        Self { level, strict, pre }
    }

    /// Requirement fragments for a gem currently locked at `locked`
    pub fn bounds(&self, locked: &str) -> Vec<String> {
        let segments = numeric_segments(locked);
        let major = segments.first().copied().unwrap_or(0);
        let minor = segments.get(1).copied().unwrap_or(0);

        let mut bounds = Vec::new();
        if self.strict {
            bounds.push(format!(">= {locked}"));
        }
        match self.level {
            Level::Major => {}
            Level::Minor => bounds.push(format!("< {}", major.saturating_add(1))),
            Level::Patch => bounds.push(format!("< {major}.{}", minor.saturating_add(1))),
        }
        bounds
    }
}

/// Leading numeric segments of a version string: `1.2.3.beta1` -> `[1, 2, 3]`
fn numeric_segments(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map_while(|segment| segment.parse::<u64>().ok())
        .collect()
}
