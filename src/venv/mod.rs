// Virtual environment lifecycle

use crate::error::{BootstrapError, Result};
use crate::interpreter::PythonVersion;
use crate::runner::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};

/// Resolved tool paths inside a virtual environment.
///
/// A compiled binary cannot "activate" a venv in the caller's shell, so
/// activation is modelled explicitly: every later step runs the venv's own
/// interpreter and tools through these paths.
#[derive(Debug, Clone)]
pub struct VenvPaths {
    pub dir: PathBuf,
    pub python: PathBuf,
    pub pip_compile: PathBuf,
}

impl VenvPaths {
    pub fn new(dir: PathBuf) -> Self {
        let scripts = if cfg!(windows) {
            dir.join("Scripts")
        } else {
            dir.join("bin")
        };
        let exe = if cfg!(windows) { ".exe" } else { "" };

        Self {
            python: scripts.join(format!("python{}", exe)),
            pip_compile: scripts.join(format!("pip-compile{}", exe)),
            dir,
        }
    }
}

/// Venv directory naming convention: the minimum version tag, not the
/// detected one, so every checkout of the project agrees on the name.
pub fn dir_name(minimum: PythonVersion) -> String {
    format!("venv{}", minimum.tag())
}

/// Create the venv if it does not exist, then resolve its paths.
///
/// Idempotent: an existing directory is reused untouched. A failed creation
/// attempt is not itself fatal; the missing interpreter binary afterwards is,
/// and surfaces as the activation failure.
pub fn ensure(
    runner: &dyn CommandRunner,
    project_root: &Path,
    system_python: &str,
    minimum: PythonVersion,
) -> Result<VenvPaths> {
    let venv_dir = project_root.join(dir_name(minimum));

    if venv_dir.exists() {
        tracing::debug!("Reusing virtual environment at {}", venv_dir.display());
    } else {
        tracing::info!("Creating virtual environment at {}", venv_dir.display());
        let spec = CommandSpec::new(system_python)
            .arg("-m")
            .arg("venv")
            .arg(venv_dir.display().to_string())
            .quiet();

        match runner.run(&spec) {
            Ok(output) if output.success => {}
            Ok(output) => {
                tracing::warn!("venv creation reported failure: {}", output.stderr);
            }
            Err(e) => {
                tracing::warn!("venv creation could not run: {}", e);
            }
        }
    }

    let paths = VenvPaths::new(venv_dir);
    if !paths.python.exists() {
        return Err(BootstrapError::ActivationFailure(paths.dir.clone()));
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, MockCommandRunner};
    use std::fs;

    fn fake_venv(root: &Path, minimum: PythonVersion) {
        let scripts = root.join(dir_name(minimum)).join(if cfg!(windows) {
            "Scripts"
        } else {
            "bin"
        });
        fs::create_dir_all(&scripts).unwrap();
        let exe = if cfg!(windows) { "python.exe" } else { "python" };
        fs::write(scripts.join(exe), "").unwrap();
    }

    #[test]
    fn test_dir_name_uses_minimum_tag() {
        assert_eq!(dir_name(PythonVersion::new(3, 9)), "venv0309");
        assert_eq!(dir_name(PythonVersion::new(3, 12)), "venv0312");
    }

    #[test]
    fn test_ensure_creates_missing_venv() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let minimum = PythonVersion::new(3, 9);

        let mut runner = MockCommandRunner::new();
        let root_clone = root.clone();
        runner
            .expect_run()
            .times(1)
            .withf(|spec| spec.program == "python3" && spec.args[..2] == ["-m", "venv"])
            .returning(move |_| {
                fake_venv(&root_clone, PythonVersion::new(3, 9));
                Ok(CommandOutput::succeeded())
            });

        let paths = ensure(&runner, &root, "python3", minimum).unwrap();
        assert!(paths.python.exists());
        assert!(paths.dir.ends_with("venv0309"));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let minimum = PythonVersion::new(3, 9);
        fake_venv(tmp.path(), minimum);

        // Existing venv: the creation command must never run
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);

        let paths = ensure(&runner, tmp.path(), "python3", minimum).unwrap();
        assert!(paths.python.exists());
    }

    #[test]
    fn test_ensure_fails_activation_when_creation_produced_nothing() {
        let tmp = tempfile::tempdir().unwrap();

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::succeeded()));

        let err = ensure(&runner, tmp.path(), "python3", PythonVersion::new(3, 9)).unwrap_err();
        assert!(matches!(err, BootstrapError::ActivationFailure(_)));
    }
}
