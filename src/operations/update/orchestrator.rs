//! Update workflow
//!
//! Steps, in order:
//! 1. Bootstrap manifest plugins
//! 2. Resolve the update scope and build the definition
//! 3. Configure version promotion
//! 4. Configure the fetcher
//! 5. Derive install options
//! 6. Validate the Ruby runtime
//! 7. Install and write the lockfile
//! 8. Refresh the package cache
//! 9. Clean unused gems
//! 10. Report
//!
//! A failing step aborts every later step.

use super::options::{UpdateOptions, adapt};
use super::request::UpdateRequest;
use super::scope::resolve;
use crate::cache::{AppCache, Cleaner};
use crate::config::Settings;
use crate::definition::{DefinitionBuilder, Level, VersionPromoter};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::installer::{InstallReport, InstallRequest, Installer, PluginInstaller};
use crate::project::Project;
use crate::ui::{self, Ui, without_groups_message};

/// Collaborators used by one update run
pub struct UpdateEnv<'a> {
    pub project: &'a Project,
    pub settings: &'a mut Settings,
    pub definitions: &'a dyn DefinitionBuilder,
    pub installer: &'a dyn Installer,
    pub app_cache: &'a dyn AppCache,
    pub cleaner: &'a dyn Cleaner,
    pub plugins: &'a dyn PluginInstaller,
    pub ui: &'a dyn Ui,
}

/// High-level update operation
pub struct UpdateOperation<'a> {
    env: UpdateEnv<'a>,
}

impl<'a> UpdateOperation<'a> {
    pub fn new(env: UpdateEnv<'a>) -> Self {
        Self { env }
    }

    /// Update `gems` (all gems when empty and no other selector is given)
    pub fn execute(&mut self, gems: Vec<String>, options: &UpdateOptions) -> Result<InstallReport> {
        let env = &mut self.env;
        if options.quiet {
            env.ui.set_level(ui::Level::Error);
        }

        if env.settings.plugins() {
            let manifest = env.project.manifest()?;
            if !manifest.plugins.is_empty() {
                tracing::debug!(plugins = ?manifest.plugins, "bootstrapping plugins");
                env.plugins.install(env.project, &manifest.plugins)?;
            }
        }

        let request = UpdateRequest::new(gems, options);
        let scope = resolve(&request, env.project, env.definitions)?;
        let mut definition = env.definitions.build(scope.into_unlock(options.conservative))?;

        let level = Level::from_flags(options.major, options.minor, options.patch)?;
        definition.set_promoter(VersionPromoter::new(level, options.strict, options.pre));

        let fetcher = Fetcher {
            disable_endpoint: options.full_index,
        };

        let install_options = adapt(options, env.settings);

        tracing::debug!("validating runtime");
        definition.validate_runtime()?;

        let report = env.installer.install(
            &mut definition,
            &InstallRequest {
                project: env.project,
                options: &install_options,
                settings: &*env.settings,
                fetcher: &fetcher,
            },
        )?;
        tracing::debug!(
            installed = report.installed.len(),
            skipped = report.skipped.len(),
            "install finished"
        );

        if env.app_cache.exists() {
            tracing::debug!("refreshing package cache");
            env.app_cache.refresh(&report)?;
        }

        if env.settings.clean() && env.settings.path().is_some() {
            tracing::debug!("cleaning unused gems");
            env.cleaner.clean(options, &report)?;
        }

        env.ui.confirm("Bundle updated!");
        let without = env.settings.without();
        if !without.is_empty() {
            env.ui.info(&without_groups_message(&without));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests;
