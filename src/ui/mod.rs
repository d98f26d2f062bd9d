//! User-facing output
//!
//! This module handles:
//! - Leveled shell messages (confirm, info, warn, error)
//! - Progress reporting for installs, see [`progress`]
//!
//! Diagnostics for developers go through `tracing` instead.

pub mod progress;

use std::sync::atomic::{AtomicU8, Ordering};

use console::style;

use crate::common::string_utils::quoted_list;

/// Minimum importance a message needs to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
}

impl Level {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Error,
            1 => Level::Warn,
            _ => Level::Info,
        }
    }
}

/// Reporting sink for the update workflow
pub trait Ui: Send + Sync {
    /// Success message
    fn confirm(&self, message: &str);

    /// Informational message
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Hide everything below `level`
    fn set_level(&self, level: Level);

    /// Whether progress bars and informational output are shown
    fn is_quiet(&self) -> bool;
}

/// Terminal output through `console`
#[derive(Debug)]
pub struct ShellUi {
    level: AtomicU8,
}

impl Default for ShellUi {
    fn default() -> Self {
        Self {
            level: AtomicU8::new(Level::Info as u8),
        }
    }
}

impl ShellUi {
    fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    fn shows(&self, level: Level) -> bool {
        level <= self.level()
    }
}

impl Ui for ShellUi {
    fn confirm(&self, message: &str) {
        if self.shows(Level::Info) {
            println!("{}", style(message).green());
        }
    }

    fn info(&self, message: &str) {
        if self.shows(Level::Info) {
            println!("{message}");
        }
    }

    fn warn(&self, message: &str) {
        if self.shows(Level::Warn) {
            eprintln!("{}", style(message).yellow());
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    fn is_quiet(&self) -> bool {
        !self.shows(Level::Info)
    }
}

/// Notice listing groups that were excluded from the update
pub fn without_groups_message(groups: &[String]) -> String {
    let names: Vec<&str> = groups.iter().map(String::as_str).collect();
    let noun = if names.len() == 1 { "group" } else { "groups" };
    format!(
        "Gems in the {noun} {} were not updated.",
        quoted_list(&names, "and")
    )
}
