// External command execution
//
// Every external tool (python, pip, pip-compile, aws) is invoked through the
// CommandRunner trait so the pipeline can be exercised in tests without
// touching real tools.

use crate::error::{BootstrapError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables for the child process.
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    /// Capture child output instead of inheriting the terminal.
    pub quiet: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Human-readable form for logs and diagnostics.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of a finished child process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }
}

/// Blocking executor for external commands. Each call waits for child exit;
/// there is no concurrency anywhere in the pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Production runner backed by std::process.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        tracing::debug!("Running: {}", spec.display());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        if spec.quiet {
            let output = cmd
                .stdin(Stdio::null())
                .output()
                .map_err(|e| BootstrapError::CommandFailed(format!("{}: {}", spec.program, e)))?;

            Ok(CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        } else {
            // Interactive tools (aws sso login opens a browser flow) keep the
            // terminal; only the exit status is observed.
            let status = cmd
                .status()
                .map_err(|e| BootstrapError::CommandFailed(format!("{}: {}", spec.program, e)))?;

            Ok(CommandOutput {
                success: status.success(),
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("python3")
            .arg("-m")
            .args(["pip", "install"])
            .env("PIP_QUIET", "1")
            .quiet();

        assert_eq!(spec.program, "python3");
        assert_eq!(spec.args, vec!["-m", "pip", "install"]);
        assert_eq!(spec.env, vec![("PIP_QUIET".to_string(), "1".to_string())]);
        assert!(spec.quiet);
        assert_eq!(spec.display(), "python3 -m pip install");
    }

    #[test]
    fn test_process_runner_missing_program() {
        let runner = ProcessRunner;
        let spec = CommandSpec::new("devup-no-such-program-xyz").quiet();
        let err = runner.run(&spec).unwrap_err();
        assert!(matches!(err, BootstrapError::CommandFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_output() {
        let runner = ProcessRunner;
        let spec = CommandSpec::new("echo").arg("hello").quiet();
        let output = runner.run(&spec).unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, "hello");
    }
}
