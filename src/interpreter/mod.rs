// Python interpreter discovery and version checks

use crate::error::{BootstrapError, Result};
use crate::runner::{CommandRunner, CommandSpec};
use std::fmt;
use std::str::FromStr;

/// One-liner handed to the interpreter to report its own version.
const VERSION_PROBE: &str =
    "import sys; print('{}.{}'.format(sys.version_info[0], sys.version_info[1]))";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Zero-padded 4-digit tag (major * 100 + minor): 3.9 -> "0309",
    /// 3.12 -> "0312". Used for the venv directory naming convention.
    pub fn tag(&self) -> String {
        format!("{:04}", self.major * 100 + self.minor)
    }

    /// Fails with the version-insufficient diagnostic when below `required`.
    pub fn ensure_at_least(&self, required: PythonVersion) -> Result<()> {
        if *self < required {
            return Err(BootstrapError::VersionInsufficient {
                found: self.to_string(),
                required: required.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = BootstrapError;

    /// Accepts "3.9" or a longer dotted form like "3.9.18" (extra components
    /// beyond major.minor are ignored).
    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            || BootstrapError::ConfigError(format!("Invalid Python version string: '{}'", s));

        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;

        Ok(Self { major, minor })
    }
}

/// Ask the interpreter on PATH for its major.minor version.
pub fn probe(runner: &dyn CommandRunner, program: &str) -> Result<PythonVersion> {
    let spec = CommandSpec::new(program)
        .arg("-c")
        .arg(VERSION_PROBE)
        .quiet();

    let output = runner
        .run(&spec)
        .map_err(|e| BootstrapError::InterpreterNotFound(format!("{} ({})", program, e)))?;

    if !output.success {
        return Err(BootstrapError::InterpreterNotFound(format!(
            "{} exited with an error: {}",
            program, output.stderr
        )));
    }

    output.stdout.parse().map_err(|_| {
        BootstrapError::InterpreterNotFound(format!(
            "{} reported an unparseable version: '{}'",
            program, output.stdout
        ))
    })
}
