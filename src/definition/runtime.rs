//! Ruby runtime detection

use std::path::Path;

use crate::command::CommandRunner;

/// Version of the `ruby` on PATH, or `None` when it cannot be determined
pub fn detect_ruby_version(runner: &dyn CommandRunner, working_dir: &Path) -> Option<String> {
    let args = ["-e".to_string(), "print RUBY_VERSION".to_string()];
    match runner.run("ruby", &args, working_dir) {
        Ok(output) if output.success => {
            let version = output.stdout.trim().to_string();
            (!version.is_empty()).then_some(version)
        }
        Ok(output) => {
            tracing::warn!(reason = %output.failure_reason(), "could not detect ruby version");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not detect ruby version");
            None
        }
    }
}
