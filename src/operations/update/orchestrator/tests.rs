//! Tests for the update workflow

use std::cell::RefCell;

use super::*;
use crate::config::{GemDependency, LockedSpec, Lockfile, Manifest};
use crate::definition::{Definition, Unlock};
use crate::error::BundleupError;
use crate::operations::update::InstallOptions;
use crate::ui::testing::RecordingUi;
use tempfile::TempDir;

type Events = RefCell<Vec<String>>;

struct FakeDefinitions<'a> {
    events: &'a Events,
    ruby: Option<&'static str>,
    unlocks: RefCell<Vec<Unlock>>,
}

impl DefinitionBuilder for FakeDefinitions<'_> {
    fn current(&self) -> Result<Definition> {
        self.events.borrow_mut().push("current".to_string());
        Ok(definition(Unlock::Nothing, self.ruby))
    }

    fn build(&self, unlock: Unlock) -> Result<Definition> {
        self.events.borrow_mut().push("build".to_string());
        self.unlocks.borrow_mut().push(unlock.clone());
        Ok(definition(unlock, self.ruby))
    }
}

fn definition(unlock: Unlock, ruby: Option<&str>) -> Definition {
    let manifest = Manifest {
        ruby: ruby.map(str::to_string),
        gems: vec![
            GemDependency::new("rack"),
            GemDependency::new("rspec").in_groups(&["test"]),
        ],
        ..Manifest::default()
    };
    Definition::new(manifest, Some(lockfile()), unlock, Some("3.3.0".to_string()))
}

fn lockfile() -> Lockfile {
    Lockfile {
        specs: vec![
            LockedSpec::new("rack", "3.0.9"),
            LockedSpec::new("rspec", "3.13.0"),
        ],
        ..Lockfile::default()
    }
}

struct FakeInstaller<'a> {
    events: &'a Events,
    fail: bool,
    seen: RefCell<Option<(InstallOptions, Option<usize>, bool)>>,
}

impl Installer for FakeInstaller<'_> {
    fn install(&self, definition: &mut Definition, request: &InstallRequest<'_>) -> Result<InstallReport> {
        self.events.borrow_mut().push("install".to_string());
        *self.seen.borrow_mut() = Some((
            request.options.clone(),
            request.settings.jobs()?,
            request.fetcher.disable_endpoint,
        ));
        if self.fail {
            return Err(crate::error::install::failed("rack", "exit status 1"));
        }
        Ok(InstallReport {
            lockfile: definition.to_lockfile(),
            ..InstallReport::default()
        })
    }
}

struct FakeCache<'a> {
    events: &'a Events,
    exists: bool,
}

impl AppCache for FakeCache<'_> {
    fn exists(&self) -> bool {
        self.exists
    }

    fn refresh(&self, _report: &InstallReport) -> Result<()> {
        self.events.borrow_mut().push("cache".to_string());
        Ok(())
    }
}

struct FakeCleaner<'a> {
    events: &'a Events,
}

impl Cleaner for FakeCleaner<'_> {
    fn clean(&self, _options: &UpdateOptions, _report: &InstallReport) -> Result<()> {
        self.events.borrow_mut().push("clean".to_string());
        Ok(())
    }
}

struct FakePlugins<'a> {
    events: &'a Events,
    fail: bool,
}

impl PluginInstaller for FakePlugins<'_> {
    fn install(&self, _project: &Project, plugins: &[String]) -> Result<()> {
        self.events
            .borrow_mut()
            .push(format!("plugins {}", plugins.join(",")));
        if self.fail {
            return Err(crate::error::install::plugin_failed("bundler-graph", "not found"));
        }
        Ok(())
    }
}

/// Project on disk plus every fake collaborator
struct Harness {
    _temp: TempDir,
    project: Project,
    settings: Settings,
    events: Events,
    ui: RecordingUi,
    ruby: Option<&'static str>,
    cache_exists: bool,
    fail_install: bool,
    fail_plugins: bool,
    unlocks: Vec<Unlock>,
    install_seen: Option<(InstallOptions, Option<usize>, bool)>,
}

impl Harness {
    fn new(with_lockfile: bool) -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("bundle.yaml"),
            "plugins: [bundler-graph]\ngems:\n  - name: rack\n  - name: rspec\n    groups: [test]\n",
        )
        .unwrap();
        if with_lockfile {
            lockfile().save(&temp.path().join("bundle.lock")).unwrap();
        }
        let project = Project::locate(None, temp.path()).unwrap();

        Self {
            _temp: temp,
            project,
            settings: Settings::default(),
            events: RefCell::new(Vec::new()),
            ui: RecordingUi::default(),
            ruby: None,
            cache_exists: false,
            fail_install: false,
            fail_plugins: false,
            unlocks: Vec::new(),
            install_seen: None,
        }
    }

    fn run(&mut self, gems: &[&str], options: &UpdateOptions) -> Result<InstallReport> {
        let definitions = FakeDefinitions {
            events: &self.events,
            ruby: self.ruby,
            unlocks: RefCell::new(Vec::new()),
        };
        let installer = FakeInstaller {
            events: &self.events,
            fail: self.fail_install,
            seen: RefCell::new(None),
        };
        let app_cache = FakeCache {
            events: &self.events,
            exists: self.cache_exists,
        };
        let cleaner = FakeCleaner {
            events: &self.events,
        };
        let plugins = FakePlugins {
            events: &self.events,
            fail: self.fail_plugins,
        };

        let result = UpdateOperation::new(UpdateEnv {
            project: &self.project,
            settings: &mut self.settings,
            definitions: &definitions,
            installer: &installer,
            app_cache: &app_cache,
            cleaner: &cleaner,
            plugins: &plugins,
            ui: &self.ui,
        })
        .execute(gems.iter().map(|g| (*g).to_string()).collect(), options);

        self.unlocks = definitions.unlocks.into_inner();
        self.install_seen = installer.seen.into_inner();
        result
    }

    fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn confirmed(&self) -> bool {
        self.ui
            .messages()
            .contains(&"confirm: Bundle updated!".to_string())
    }
}

#[test]
fn test_full_update_runs_every_step_in_order() {
    let mut harness = Harness::new(true);
    harness.cache_exists = true;
    harness.settings.set_temporary("clean", "true");
    harness.settings.set_temporary("path", "vendor/bundle");

    harness.run(&[], &UpdateOptions::default()).unwrap();

    assert_eq!(
        harness.events(),
        vec!["plugins bundler-graph", "build", "install", "cache", "clean"]
    );
    assert_eq!(harness.unlocks, vec![Unlock::All]);
    assert!(harness.confirmed());
}

#[test]
fn test_full_update_without_lockfile() {
    let mut harness = Harness::new(false);
    harness.run(&[], &UpdateOptions::default()).unwrap();
    assert_eq!(harness.unlocks, vec![Unlock::All]);
}

#[test]
fn test_install_options_always_mark_update() {
    let mut harness = Harness::new(true);
    let options = UpdateOptions {
        local: true,
        full_index: true,
        ..UpdateOptions::default()
    };

    harness.run(&[], &options).unwrap();

    let (install_options, _, disable_endpoint) = harness.install_seen.clone().unwrap();
    assert!(install_options.update);
    assert!(install_options.local);
    assert!(disable_endpoint);
}

#[test]
fn test_jobs_reach_settings_before_install() {
    let mut harness = Harness::new(true);
    let options = UpdateOptions {
        jobs: Some(4),
        ..UpdateOptions::default()
    };

    harness.run(&[], &options).unwrap();

    let (_, jobs, _) = harness.install_seen.clone().unwrap();
    assert_eq!(jobs, Some(4));
}

#[test]
fn test_partial_update_unknown_gem_stops_before_install() {
    let mut harness = Harness::new(true);

    let err = harness.run(&["rakk"], &UpdateOptions::default()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Could not find gem 'rakk'. Did you mean 'rack'?"
    );
    assert_eq!(harness.events(), vec!["plugins bundler-graph"]);
    assert!(!harness.confirmed());
}

#[test]
fn test_partial_update_without_lockfile() {
    let mut harness = Harness::new(false);
    let err = harness.run(&["rack"], &UpdateOptions::default()).unwrap_err();

    assert!(matches!(err, BundleupError::LockfileMissing));
    assert!(harness.unlocks.is_empty());
}

#[test]
fn test_group_update_scopes_definition() {
    let mut harness = Harness::new(true);
    let options = UpdateOptions {
        groups: vec!["test".to_string()],
        conservative: true,
        ..UpdateOptions::default()
    };

    harness.run(&["rack"], &options).unwrap();

    assert_eq!(
        harness.unlocks,
        vec![Unlock::Scoped {
            names: vec!["rack".to_string(), "rspec".to_string()],
            sources: Vec::new(),
            ruby: false,
            bundler: false,
            conservative: true,
        }]
    );
    assert_eq!(
        harness.events(),
        vec!["plugins bundler-graph", "current", "build", "install"]
    );
}

#[test]
fn test_clean_requires_path() {
    let mut harness = Harness::new(true);
    harness.settings.set_temporary("clean", "true");

    harness.run(&[], &UpdateOptions::default()).unwrap();

    assert!(!harness.events().contains(&"clean".to_string()));
}

#[test]
fn test_plugins_disabled() {
    let mut harness = Harness::new(true);
    harness.settings.set_temporary("plugins", "false");

    harness.run(&[], &UpdateOptions::default()).unwrap();

    assert_eq!(harness.events(), vec!["build", "install"]);
}

#[test]
fn test_plugin_failure_aborts() {
    let mut harness = Harness::new(true);
    harness.fail_plugins = true;

    let err = harness.run(&[], &UpdateOptions::default()).unwrap_err();

    assert!(matches!(err, BundleupError::PluginInstallFailed { .. }));
    assert_eq!(harness.events(), vec!["plugins bundler-graph"]);
}

#[test]
fn test_runtime_mismatch_aborts_before_install() {
    let mut harness = Harness::new(true);
    harness.ruby = Some("2.7.8");

    let err = harness.run(&[], &UpdateOptions::default()).unwrap_err();

    assert!(matches!(err, BundleupError::RubyVersionMismatch { .. }));
    assert!(!harness.events().contains(&"install".to_string()));
}

#[test]
fn test_install_failure_skips_cache_and_report() {
    let mut harness = Harness::new(true);
    harness.cache_exists = true;
    harness.fail_install = true;

    let err = harness.run(&[], &UpdateOptions::default()).unwrap_err();

    assert!(matches!(err, BundleupError::InstallFailed { .. }));
    assert!(!harness.events().contains(&"cache".to_string()));
    assert!(!harness.confirmed());
}

#[test]
fn test_conflicting_level_flags() {
    let mut harness = Harness::new(true);
    let options = UpdateOptions {
        major: true,
        patch: true,
        ..UpdateOptions::default()
    };

    let err = harness.run(&[], &options).unwrap_err();

    assert!(matches!(err, BundleupError::InvalidOption { .. }));
    assert!(!harness.events().contains(&"install".to_string()));
}

#[test]
fn test_without_groups_notice() {
    let mut harness = Harness::new(true);
    harness.settings.set_temporary("without", "test");

    harness.run(&[], &UpdateOptions::default()).unwrap();

    assert_eq!(
        harness.ui.messages(),
        vec![
            "confirm: Bundle updated!",
            "info: Gems in the group 'test' were not updated."
        ]
    );
}

#[test]
fn test_quiet_lowers_ui_level() {
    let mut harness = Harness::new(true);
    let options = UpdateOptions {
        quiet: true,
        ..UpdateOptions::default()
    };

    harness.run(&[], &options).unwrap();

    assert_eq!(harness.ui.level(), Some(ui::Level::Error));
}
