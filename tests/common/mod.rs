//! Common test utilities for bundleup integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway project directory
pub struct TestProject {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    /// Create an empty project directory (no manifest yet)
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a project with the given `bundle.yaml`
    pub fn with_manifest(manifest: &str) -> Self {
        let project = Self::new();
        project.write_file("bundle.yaml", manifest);
        project
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write a lockfile containing `specs` as `(name, version)` pairs
    #[allow(dead_code)]
    pub fn write_lockfile(&self, specs: &[(&str, &str)]) {
        let specs: Vec<serde_json::Value> = specs
            .iter()
            .map(|(name, version)| serde_json::json!({"name": name, "version": version}))
            .collect();
        let lockfile = serde_json::json!({
            "sources": ["https://rubygems.org"],
            "specs": specs,
            "dependencies": [],
        });
        self.write_file(
            "bundle.lock",
            &serde_json::to_string_pretty(&lockfile).expect("Failed to serialize lockfile"),
        );
    }

    /// bundleup command running in the project, isolated from user settings
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("bundleup").expect("Failed to find bundleup binary");
        cmd.current_dir(&self.path)
            .env("BUNDLE_USER_CONFIG", self.temp.path().join("user-config"))
            .env("BUNDLE_PATH", "vendor/bundle")
            .env_remove("BUNDLE_GEMFILE")
            .env_remove("BUNDLE_WITHOUT")
            .env_remove("BUNDLE_JOBS")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
