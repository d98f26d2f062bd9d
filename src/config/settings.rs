//! Settings store (`.bundle/config`)
//!
//! Settings are read from four layers, highest precedence first:
//!
//! 1. temporary values set for the current invocation only
//! 2. `BUNDLE_<KEY>` environment variables
//! 3. the project's `.bundle/config`
//! 4. the user's `~/.bundle/config` (or `$BUNDLE_USER_CONFIG`)
//!
//! Config files are YAML maps keyed by the environment variable name:
//!
//! ```yaml
//! BUNDLE_PATH: "vendor/bundle"
//! BUNDLE_JOBS: "4"
//! BUNDLE_WITHOUT: "development:test"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{
    Result,
    config::{invalid, parse_failed},
    fs::read_failed,
};

/// Directory holding per-project settings and state
pub const SETTINGS_DIR: &str = ".bundle";

/// Settings file name inside [`SETTINGS_DIR`]
pub const SETTINGS_FILE: &str = "config";

/// Environment variable overriding the user-level settings file
const USER_CONFIG_ENV: &str = "BUNDLE_USER_CONFIG";

/// Process-wide settings, passed explicitly to whoever needs them
#[derive(Debug, Clone, Default)]
pub struct Settings {
    temporary: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
    local: BTreeMap<String, String>,
    global: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings for the project at `root` from files and the process environment
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_with_env(root, std::env::vars())
    }

    /// Load settings using `vars` in place of the process environment
    pub fn load_with_env<I>(root: &Path, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: BTreeMap<String, String> = vars
            .into_iter()
            .filter(|(key, _)| key.starts_with("BUNDLE_"))
            .collect();

        let global_path = env
            .get(USER_CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE)));

        let global = match global_path {
            Some(path) => read_config_file(&path)?,
            None => BTreeMap::new(),
        };
        let local = read_config_file(&root.join(SETTINGS_DIR).join(SETTINGS_FILE))?;

        tracing::debug!(
            env = env.len(),
            local = local.len(),
            global = global.len(),
            "loaded settings"
        );

        Ok(Self {
            temporary: BTreeMap::new(),
            env,
            local,
            global,
        })
    }

    /// Raw value for `key` (e.g. "jobs"), honoring layer precedence
    pub fn get(&self, key: &str) -> Option<&str> {
        let env_key = env_key(key);
        self.temporary
            .get(&env_key)
            .or_else(|| self.env.get(&env_key))
            .or_else(|| self.local.get(&env_key))
            .or_else(|| self.global.get(&env_key))
            .map(String::as_str)
    }

    /// Set a value for the current invocation only; nothing is persisted
    pub fn set_temporary(&mut self, key: &str, value: impl Into<String>) {
        self.temporary.insert(env_key(key), value.into());
    }

    /// Number of parallel install jobs
    pub fn jobs(&self) -> Result<Option<usize>> {
        let Some(raw) = self.get("jobs") else {
            return Ok(None);
        };
        match raw.trim().parse::<usize>() {
            Ok(jobs) if jobs > 0 => Ok(Some(jobs)),
            _ => Err(invalid(format!(
                "jobs must be a positive integer, got '{raw}'"
            ))),
        }
    }

    /// Whether unused gems are removed after installing
    pub fn clean(&self) -> bool {
        self.flag("clean", false)
    }

    /// Whether plugins declared in the manifest are bootstrapped
    pub fn plugins(&self) -> bool {
        self.flag("plugins", true)
    }

    /// Configured install path, as written
    pub fn path(&self) -> Option<PathBuf> {
        self.get("path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Configured install path resolved against the project root
    pub fn install_path(&self, root: &Path) -> Option<PathBuf> {
        self.path().map(|path| {
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        })
    }

    /// Groups excluded from installation
    pub fn without(&self) -> Vec<String> {
        self.get("without")
            .map(|raw| {
                raw.split(|c: char| c == ':' || c.is_whitespace())
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                tracing::warn!(key, value = raw, "ignoring non-boolean setting");
                default
            }),
        }
    }
}

/// Environment/config-file key for a setting name: `jobs` -> `BUNDLE_JOBS`
fn env_key(key: &str) -> String {
    format!("BUNDLE_{}", key.to_uppercase().replace('.', "__"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Read a YAML settings file; a missing file is an empty layer
fn read_config_file(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;
    let value: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?;

    let mapping = match value {
        serde_yaml::Value::Null => return Ok(BTreeMap::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => {
            return Err(parse_failed(
                path.display().to_string(),
                "expected a map of BUNDLE_* keys",
            ));
        }
    };

    let mut settings = BTreeMap::new();
    for (key, value) in mapping {
        let (Some(key), Some(value)) = (scalar_to_string(&key), scalar_to_string(&value)) else {
            return Err(parse_failed(
                path.display().to_string(),
                "settings keys and values must be scalars",
            ));
        };
        settings.insert(key, value);
    }
    Ok(settings)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
