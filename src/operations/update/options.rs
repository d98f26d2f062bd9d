//! Update options and the install options derived from them

use crate::cli::UpdateArgs;
use crate::config::Settings;

/// Options given to `bundleup update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    pub sources: Vec<String>,
    pub groups: Vec<String>,
    pub ruby: bool,
    pub bundler: bool,
    /// Install only from gems already on this machine
    pub local: bool,
    pub jobs: Option<usize>,
    /// Use full indexes instead of the dependency API
    pub full_index: bool,
    pub quiet: bool,
    pub conservative: bool,
    pub major: bool,
    pub minor: bool,
    pub patch: bool,
    pub strict: bool,
    pub pre: bool,
}

impl From<&UpdateArgs> for UpdateOptions {
    fn from(args: &UpdateArgs) -> Self {
        Self {
            sources: args.source.clone(),
            groups: args.group.clone(),
            ruby: args.ruby,
            bundler: args.bundler,
            local: args.local,
            jobs: args.jobs,
            full_index: args.full_index,
            quiet: args.quiet,
            conservative: args.conservative,
            major: args.major,
            minor: args.minor,
            patch: args.patch,
            strict: args.strict,
            pre: args.pre,
        }
    }
}

/// Options handed to the installer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Set for every install started by `update`
    pub update: bool,
    pub local: bool,
    pub jobs: Option<usize>,
    pub full_index: bool,
    pub quiet: bool,
    pub conservative: bool,
    pub pre: bool,
}

impl From<&UpdateOptions> for InstallOptions {
    fn from(options: &UpdateOptions) -> Self {
        Self {
            update: false,
            local: options.local,
            jobs: options.jobs,
            full_index: options.full_index,
            quiet: options.quiet,
            conservative: options.conservative,
            pre: options.pre,
        }
    }
}

/// Build install options for an update run
///
/// A `jobs` option is written to `settings` for this invocation before
/// anything is installed.
pub fn adapt(options: &UpdateOptions, settings: &mut Settings) -> InstallOptions {
    let mut install = InstallOptions::from(options);
    install.update = true;
    install.local = options.local;

    if let Some(jobs) = options.jobs {
        tracing::debug!(jobs, "setting install jobs");
        settings.set_temporary("jobs", jobs.to_string());
    }

    install
}
