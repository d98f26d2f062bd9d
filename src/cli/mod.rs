//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - update: Update command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod update;

pub use completions::CompletionsArgs;
pub use update::UpdateArgs;

/// bundleup - scoped updates for Ruby gem bundles
#[derive(Parser, Debug)]
#[command(
    name = "bundleup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Update the gems of a locked Ruby bundle",
    long_about = "bundleup re-resolves a locked gem bundle. Update everything, or name gems, \
                  sources or groups to change only those while the rest stays at its locked version.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  bundleup update                      \x1b[90m# Update every gem\x1b[0m\n   \
                  bundleup update rack                 \x1b[90m# Update rack and its dependencies\x1b[0m\n   \
                  bundleup update --group test         \x1b[90m# Update the test group\x1b[0m\n   \
                  bundleup update rails --minor        \x1b[90m# Stay within the current major version\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Path to the manifest (defaults to bundle.yaml in this or a parent directory)
    #[arg(long, global = true, env = "BUNDLE_GEMFILE", value_name = "PATH")]
    pub gemfile: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update gems to newer versions
    Update(UpdateArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_global_gemfile() {
        let cli = Cli::try_parse_from(["bundleup", "update", "--gemfile", "app/bundle.yaml", "-v"]).unwrap();
        assert_eq!(cli.gemfile, Some(PathBuf::from("app/bundle.yaml")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Update(_)));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["bundleup", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["bundleup", "completions", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "zsh"),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["bundleup"]).is_err());
    }
}
