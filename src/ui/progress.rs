//! Install progress reporting
//!
//! All progress reporting goes through the [`ProgressReporter`] trait, so
//! quiet runs and tests use [`SilentProgressReporter`].

use indicatif::{ProgressBar, ProgressStyle};

/// Progress of a multi-gem install
///
/// Methods take `&self` so worker threads can share one reporter.
pub trait ProgressReporter: Send + Sync {
    /// A gem started installing
    fn start_gem(&self, name: &str);

    /// A gem finished installing
    fn finish_gem(&self, name: &str);

    /// All gems are done
    fn finish(&self);

    /// Stop after an error, leaving the bar as is
    fn abandon(&self);
}

/// Interactive progress bar
pub struct InteractiveProgressReporter {
    pb: ProgressBar,
}

impl InteractiveProgressReporter {
    /// Create a reporter for `total` gems
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        Self { pb }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start_gem(&self, name: &str) {
        self.pb.set_message(format!("Installing {name}"));
    }

    fn finish_gem(&self, _name: &str) {
        self.pb.inc(1);
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }

    fn abandon(&self) {
        self.pb.abandon();
    }
}

/// No-op reporter used in quiet mode
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_gem(&self, _name: &str) {}

    fn finish_gem(&self, _name: &str) {}

    fn finish(&self) {}

    fn abandon(&self) {}
}
