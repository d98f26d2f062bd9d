//! Update command implementation
//!
//! Wires the real collaborators (RubyGems, the project on disk, the
//! terminal) into an [`UpdateOperation`] and runs it.

use std::path::PathBuf;

use crate::cache::{GemCleaner, VendorCache};
use crate::cli::UpdateArgs;
use crate::command::SystemCommandRunner;
use crate::config::Settings;
use crate::definition::ProjectDefinitions;
use crate::error::Result;
use crate::installer::{GemInstaller, GemPluginInstaller};
use crate::operations::update::{UpdateEnv, UpdateOperation, UpdateOptions};
use crate::project::Project;
use crate::ui::ShellUi;

/// Run the update command for the project at `gemfile`, or the one around the working directory
pub fn run(gemfile: Option<PathBuf>, args: UpdateArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let project = Project::locate(gemfile.as_deref(), &cwd)?;
    tracing::debug!(root = %project.root.display(), "located project");

    let mut settings = Settings::load(&project.root)?;
    let options = UpdateOptions::from(&args);

    let runner = SystemCommandRunner;
    let ui = ShellUi::default();
    let definitions = ProjectDefinitions::new(&project, &runner);
    let installer = GemInstaller::new(&runner, &ui);
    let app_cache = VendorCache::new(project.app_cache_dir());
    let cleaner = GemCleaner::new(&ui);
    let plugins = GemPluginInstaller::new(&runner, &ui);

    let mut operation = UpdateOperation::new(UpdateEnv {
        project: &project,
        settings: &mut settings,
        definitions: &definitions,
        installer: &installer,
        app_cache: &app_cache,
        cleaner: &cleaner,
        plugins: &plugins,
        ui: &ui,
    });
    operation.execute(args.gems, &options)?;

    Ok(())
}
