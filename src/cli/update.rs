use clap::Parser;

/// Arguments for the update command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                   Update every gem:\n    bundleup update\n\n\
                   Update specific gems, keeping everything else locked:\n    bundleup update rack puma\n\n\
                   Update the gems of a group:\n    bundleup update --group test\n\n\
                   Allow only patch-level changes:\n    bundleup update rails --patch --strict")]
pub struct UpdateArgs {
    /// Gems to update. Without gems, sources, groups, --ruby or --bundler, every gem is updated
    #[arg(value_name = "GEM")]
    pub gems: Vec<String>,

    /// Update every gem that comes from SOURCE
    #[arg(long, value_name = "SOURCE")]
    pub source: Vec<String>,

    /// Update every gem in GROUP
    #[arg(long, short = 'g', value_name = "GROUP")]
    pub group: Vec<String>,

    /// Record the running Ruby version in the lockfile
    #[arg(long)]
    pub ruby: bool,

    /// Record the running bundleup version in the lockfile
    #[arg(long)]
    pub bundler: bool,

    /// Do not reach the network; use gems already on this machine
    #[arg(long)]
    pub local: bool,

    /// Number of gems to install in parallel
    #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(usize))]
    pub jobs: Option<usize>,

    /// Use full indexes instead of the dependency API
    #[arg(long)]
    pub full_index: bool,

    /// Only print errors
    #[arg(long)]
    pub quiet: bool,

    /// Keep the dependencies of updated gems at their locked versions
    #[arg(long)]
    pub conservative: bool,

    /// Allow major version changes (default)
    #[arg(long)]
    pub major: bool,

    /// Allow at most minor version changes
    #[arg(long)]
    pub minor: bool,

    /// Allow at most patch version changes
    #[arg(long)]
    pub patch: bool,

    /// Never resolve below the locked version
    #[arg(long)]
    pub strict: bool,

    /// Allow prerelease versions
    #[arg(long)]
    pub pre: bool,
}
