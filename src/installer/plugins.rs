//! Plugin bootstrap
//!
//! Plugins are gems listed under `plugins:` in the manifest. They are
//! installed into `.bundle/plugin` before anything else happens.

use crate::command::CommandRunner;
use crate::common::string_utils::split_full_name;
use crate::error::{Result, install::plugin_failed};
use crate::project::Project;
use crate::ui::Ui;

/// Installs the plugins a manifest declares
pub trait PluginInstaller {
    fn install(&self, project: &Project, plugins: &[String]) -> Result<()>;
}

/// Installs plugins with `gem install --install-dir .bundle/plugin`
pub struct GemPluginInstaller<'a> {
    runner: &'a dyn CommandRunner,
    ui: &'a dyn Ui,
}

impl<'a> GemPluginInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ui: &'a dyn Ui) -> Self {
        Self { runner, ui }
    }
}

impl PluginInstaller for GemPluginInstaller<'_> {
    fn install(&self, project: &Project, plugins: &[String]) -> Result<()> {
        let plugin_dir = project.plugin_dir();

        for plugin in plugins {
            if is_plugin_installed(&plugin_dir, plugin) {
                tracing::debug!(plugin = %plugin, "plugin already installed");
                continue;
            }

            let args = vec![
                "install".to_string(),
                plugin.clone(),
                "--no-document".to_string(),
                "--install-dir".to_string(),
                plugin_dir.display().to_string(),
            ];
            let output = self
                .runner
                .run("gem", &args, &project.root)
                .map_err(|e| plugin_failed(plugin.clone(), e.to_string()))?;
            if !output.success {
                return Err(plugin_failed(plugin.clone(), output.failure_reason()));
            }
            self.ui.info(&format!("Installed plugin {plugin}"));
        }

        Ok(())
    }
}

fn is_plugin_installed(plugin_dir: &std::path::Path, plugin: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(plugin_dir.join("specifications")) else {
        return false;
    };
    entries.filter_map(std::result::Result::ok).any(|entry| {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        file_name
            .strip_suffix(".gemspec")
            .and_then(split_full_name)
            .is_some_and(|(name, _)| name == plugin)
    })
}
