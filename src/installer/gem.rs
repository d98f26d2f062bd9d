//! RubyGems-backed installer
//!
//! Each planned gem is installed with `gem install`, spread over the
//! configured number of worker threads. Runtime dependencies of whatever
//! got installed are read back from the installed gemspecs so the lockfile
//! records the real dependency graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{InstallReport, InstallRequest, Installer, gem_home, installed_version, is_installed, spec_file};
use crate::command::CommandRunner;
use crate::common::string_utils::split_full_name;
use crate::config::LockedSpec;
use crate::definition::{Definition, PlannedGem};
use crate::error::{
    Result,
    install::{command_failed, failed},
};
use crate::fetcher::Fetcher;
use crate::ui::Ui;
use crate::ui::progress::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// Prints `name version dependency...` for every gemspec path given
const SPEC_SCRIPT: &str = "ARGV.each { |f| s = Gem::Specification.load(f); next unless s; \
                           puts(([s.name, s.version.to_s] + s.runtime_dependencies.map(&:name)).join(' ')) }";

/// Name and version reported by `gem install`
type InstalledPair = (String, String);

/// Installer driving the `gem` command
pub struct GemInstaller<'a> {
    runner: &'a dyn CommandRunner,
    ui: &'a dyn Ui,
}

/// Per-run values shared by every worker
struct GemContext<'a> {
    root: &'a Path,
    install_dir: Option<PathBuf>,
    sources: &'a [String],
    fetcher: &'a Fetcher,
    local: bool,
    prerelease: bool,
    conservative: bool,
}

impl<'a> GemInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ui: &'a dyn Ui) -> Self {
        Self { runner, ui }
    }

    fn install_gem(&self, gem: &PlannedGem, ctx: &GemContext<'_>) -> Result<Vec<InstalledPair>> {
        let mut args = vec![
            "install".to_string(),
            gem.name.clone(),
            "--no-document".to_string(),
        ];
        if let Some(requirement) = gem.version_requirement() {
            args.push("--version".to_string());
            args.push(requirement);
        }
        if let Some(dir) = &ctx.install_dir {
            args.push("--install-dir".to_string());
            args.push(dir.display().to_string());
        }
        if ctx.local {
            args.push("--local".to_string());
        }
        if ctx.prerelease {
            args.push("--prerelease".to_string());
        }
        if ctx.conservative {
            args.push("--conservative".to_string());
        }
        let sources = gem
            .source
            .as_ref()
            .map_or_else(|| ctx.sources.to_vec(), |source| vec![source.clone()]);
        args.extend(ctx.fetcher.source_args(&sources));

        let output = self.runner.run("gem", &args, ctx.root)?;
        if !output.success {
            return Err(failed(gem.name.clone(), output.failure_reason()));
        }

        let mut installed = parse_installed(&output.stdout);
        if !installed.iter().any(|(name, _)| name == &gem.name) {
            // `--conservative` prints nothing for gems that already satisfy the requirement
            match &gem.locked_version {
                Some(version) => installed.push((gem.name.clone(), version.clone())),
                None => {
                    return Err(failed(
                        gem.name.clone(),
                        "gem install did not report an installed version",
                    ));
                }
            }
        }
        Ok(installed)
    }

    /// Run `install_gem` over `pending` with `jobs` workers, results in plan order
    fn install_all(
        &self,
        pending: &[PlannedGem],
        jobs: usize,
        ctx: &GemContext<'_>,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<InstalledPair>> {
        let next = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);
        let slots: Mutex<Vec<Option<Result<Vec<InstalledPair>>>>> =
            Mutex::new((0..pending.len()).map(|_| None).collect());

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|| {
                    while !stop.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(gem) = pending.get(index) else {
                            break;
                        };

                        progress.start_gem(&gem.name);
                        let result = self.install_gem(gem, ctx);
                        if result.is_err() {
                            stop.store(true, Ordering::Relaxed);
                        }
                        progress.finish_gem(&gem.name);

                        if let Ok(mut slots) = slots.lock() {
                            slots[index] = Some(result);
                        }
                    }
                });
            }
        });

        let mut installed = Vec::new();
        let slots = slots.into_inner().unwrap_or_else(PoisonError::into_inner);
        for result in slots.into_iter().flatten() {
            installed.extend(result?);
        }
        Ok(installed)
    }

    /// Locked specs for installed gems, dependencies read from their gemspecs
    fn load_specs(
        &self,
        home: &Path,
        root: &Path,
        installed: &[InstalledPair],
        sources: &HashMap<&str, Option<String>>,
    ) -> Result<Vec<LockedSpec>> {
        let mut files = Vec::new();
        for (name, version) in installed {
            match spec_file(home, name, version) {
                Some(path) => files.push(path.display().to_string()),
                None => tracing::warn!(gem = %name, version = %version, "no installed gemspec found"),
            }
        }

        let mut dependencies: HashMap<String, Vec<String>> = HashMap::new();
        if !files.is_empty() {
            let mut args = vec!["-e".to_string(), SPEC_SCRIPT.to_string()];
            args.extend(files);
            let output = self.runner.run("ruby", &args, root)?;
            if !output.success {
                return Err(command_failed("ruby -e <gemspec loader>", output.failure_reason()));
            }
            for line in output.stdout.lines() {
                let mut fields = line.split_whitespace();
                if let (Some(name), Some(_version)) = (fields.next(), fields.next()) {
                    dependencies.insert(name.to_string(), fields.map(str::to_string).collect());
                }
            }
        }

        Ok(installed
            .iter()
            .map(|(name, version)| LockedSpec {
                name: name.clone(),
                version: version.clone(),
                source: sources.get(name.as_str()).cloned().flatten(),
                dependencies: dependencies.remove(name).unwrap_or_default(),
            })
            .collect())
    }

    /// Add specs for dependencies `gem install` did not report because they were already present
    ///
    /// Repeats until every dependency of `installed` is either recorded,
    /// previously locked or missing from the gem home. Returns the names added.
    fn present_dependencies(
        &self,
        definition: &Definition,
        home: &Path,
        root: &Path,
        installed: &mut Vec<LockedSpec>,
        sources: &HashMap<&str, Option<String>>,
    ) -> Result<BTreeSet<String>> {
        let mut added = BTreeSet::new();
        loop {
            let known: BTreeSet<&str> = installed.iter().map(|s| s.name.as_str()).collect();
            let mut missing = BTreeMap::new();
            for dependency in installed.iter().flat_map(|s| &s.dependencies) {
                if known.contains(dependency.as_str())
                    || definition.is_locked(dependency)
                    || missing.contains_key(dependency)
                {
                    continue;
                }
                match installed_version(home, dependency) {
                    Some(version) => {
                        missing.insert(dependency.clone(), version);
                    }
                    None => tracing::warn!(gem = %dependency, "dependency not found in gem home"),
                }
            }
            if missing.is_empty() {
                return Ok(added);
            }

            let pairs: Vec<InstalledPair> = missing.into_iter().collect();
            tracing::debug!(dependencies = ?pairs, "recording already installed dependencies");
            added.extend(pairs.iter().map(|(name, _)| name.clone()));
            installed.extend(self.load_specs(home, root, &pairs, sources)?);
        }
    }
}

impl Installer for GemInstaller<'_> {
    fn install(&self, definition: &mut Definition, request: &InstallRequest<'_>) -> Result<InstallReport> {
        let _guard = request.project.lock()?;
        let root = request.project.root.as_path();
        let settings = request.settings;

        let home = gem_home(self.runner, settings, root)?;
        let plan = definition.install_plan(&settings.without());

        let (skipped, pending): (Vec<PlannedGem>, Vec<PlannedGem>) = plan.into_iter().partition(|gem| {
            gem.pinned
                && gem
                    .locked_version
                    .as_deref()
                    .is_some_and(|version| is_installed(&home, &gem.name, version))
        });
        let jobs = settings
            .jobs()?
            .or(request.options.jobs)
            .unwrap_or(1)
            .clamp(1, pending.len().max(1));
        tracing::debug!(
            update = request.options.update,
            full_index = request.options.full_index,
            pending = pending.len(),
            skipped = skipped.len(),
            jobs,
            home = %home.display(),
            "installing gems"
        );

        let manifest_sources = definition.manifest().sources.clone();
        let ctx = GemContext {
            root,
            install_dir: settings.install_path(root),
            sources: &manifest_sources,
            fetcher: request.fetcher,
            local: request.options.local,
            prerelease: request.options.pre || definition.promoter().pre,
            conservative: request.options.conservative,
        };

        let progress: Box<dyn ProgressReporter> = if request.options.quiet || self.ui.is_quiet() {
            Box::new(SilentProgressReporter)
        } else {
            Box::new(InteractiveProgressReporter::new(pending.len() as u64))
        };

        let pairs = match self.install_all(&pending, jobs, &ctx, progress.as_ref()) {
            Ok(pairs) => {
                progress.finish();
                pairs
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };

        // Later reports of the same gem win
        let unique: BTreeMap<String, String> = pairs.into_iter().collect();
        let unique: Vec<InstalledPair> = unique.into_iter().collect();

        let sources: HashMap<&str, Option<String>> = pending
            .iter()
            .map(|gem| (gem.name.as_str(), gem.source.clone()))
            .collect();
        let mut installed = self.load_specs(&home, root, &unique, &sources)?;
        let present = self.present_dependencies(definition, &home, root, &mut installed, &sources)?;

        for gem in &skipped {
            if let Some(version) = &gem.locked_version {
                self.ui.info(&format!("Using {} {version}", gem.name));
            }
        }
        for spec in &installed {
            if present.contains(&spec.name) {
                self.ui.info(&format!("Using {} {}", spec.name, spec.version));
            } else {
                self.ui.info(&format!("Installing {} {}", spec.name, spec.version));
            }
            definition.record_installed(spec.clone());
        }

        let lockfile = definition.lock(&request.project.lockfile_path)?;

        Ok(InstallReport {
            gem_home: home,
            installed,
            skipped: skipped.into_iter().map(|gem| gem.name).collect(),
            lockfile,
        })
    }
}

/// `(name, version)` for every "Successfully installed NAME-VERSION" line
fn parse_installed(stdout: &str) -> Vec<InstalledPair> {
    stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Successfully installed "))
        .filter_map(|full_name| split_full_name(full_name.trim()))
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect()
}
