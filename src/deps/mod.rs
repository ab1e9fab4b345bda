// Packaging tooling upgrade, lock compilation, dependency install

use crate::error::{BootstrapError, Result};
use crate::runner::{CommandRunner, CommandSpec};
use crate::venv::VenvPaths;
use std::path::Path;

/// Upgrade pip and pip-tools inside the venv, quietly.
///
/// Non-fatal: a failed upgrade is logged and the run continues with whatever
/// tool versions are already present.
pub fn upgrade_tooling(runner: &dyn CommandRunner, venv: &VenvPaths) {
    let spec = CommandSpec::new(venv.python.display().to_string())
        .args(["-m", "pip", "install", "--upgrade", "--quiet", "pip", "pip-tools"])
        .quiet();

    match runner.run(&spec) {
        Ok(output) if output.success => {
            tracing::debug!("pip and pip-tools upgraded");
        }
        Ok(output) => {
            tracing::warn!("Tooling upgrade failed, continuing: {}", output.stderr);
        }
        Err(e) => {
            tracing::warn!("Tooling upgrade could not run, continuing: {}", e);
        }
    }
}

/// Regenerate the pinned lock file from the source requirements.
///
/// The lock file is rewritten on every run; it is never reused stale. All
/// transitive dependencies are pinned and optional extras stripped.
pub fn compile_lock(
    runner: &dyn CommandRunner,
    venv: &VenvPaths,
    requirements_in: &Path,
    lock_file: &Path,
) -> Result<()> {
    if !requirements_in.exists() {
        return Err(BootstrapError::DependencyInstallation(format!(
            "requirements source {} not found",
            requirements_in.display()
        )));
    }

    let spec = CommandSpec::new(venv.pip_compile.display().to_string())
        .arg("--upgrade")
        .arg("--strip-extras")
        .arg("--output-file")
        .arg(lock_file.display().to_string())
        .arg(requirements_in.display().to_string())
        .quiet();

    let output = runner
        .run(&spec)
        .map_err(|e| BootstrapError::DependencyInstallation(e.to_string()))?;

    if !output.success {
        return Err(BootstrapError::DependencyInstallation(format!(
            "pip-compile failed: {}",
            output.stderr
        )));
    }

    // pip-compile can exit zero without writing anything (e.g. interrupted
    // resolver); the lock file itself is the contract.
    if !lock_file.exists() {
        return Err(BootstrapError::DependencyInstallation(format!(
            "lock file {} was not produced",
            lock_file.display()
        )));
    }

    tracing::info!("Compiled lock file {}", lock_file.display());
    Ok(())
}

/// Install the pinned dependencies from the lock file into the venv.
pub fn install_locked(runner: &dyn CommandRunner, venv: &VenvPaths, lock_file: &Path) -> Result<()> {
    if !lock_file.exists() {
        return Err(BootstrapError::DependencyInstallation(format!(
            "lock file {} not found",
            lock_file.display()
        )));
    }

    let spec = CommandSpec::new(venv.python.display().to_string())
        .args(["-m", "pip", "install", "--upgrade", "-r"])
        .arg(lock_file.display().to_string())
        .quiet();

    let output = runner
        .run(&spec)
        .map_err(|e| BootstrapError::DependencyInstallation(e.to_string()))?;

    if !output.success {
        return Err(BootstrapError::DependencyInstallation(format!(
            "pip install failed: {}",
            output.stderr
        )));
    }

    tracing::info!("Installed dependencies from {}", lock_file.display());
    Ok(())
}
