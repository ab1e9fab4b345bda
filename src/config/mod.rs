// Configuration management
use crate::error::{BootstrapError, Result};
use crate::interpreter::PythonVersion;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub python: PythonConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub dynamodb: DynamoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Minimum interpreter version, "major.minor".
    #[serde(default = "default_minimum")]
    pub minimum: String,
    /// Interpreter looked up on PATH to probe and create the venv with.
    #[serde(default = "default_program")]
    pub program: String,
}

fn default_minimum() -> String {
    "3.9".to_string()
}

fn default_program() -> String {
    "python3".to_string()
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            minimum: default_minimum(),
            program: default_program(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Human-edited requirements specification, relative to the project root.
    #[serde(default = "default_requirements_in")]
    pub requirements_in: PathBuf,
    /// Generated pinned lock file, overwritten on every run.
    #[serde(default = "default_requirements_lock")]
    pub requirements_lock: PathBuf,
}

fn default_requirements_in() -> PathBuf {
    PathBuf::from("config/requirements.in")
}

fn default_requirements_lock() -> PathBuf {
    PathBuf::from("config/requirements.txt")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            requirements_in: default_requirements_in(),
            requirements_lock: default_requirements_lock(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsConfig {
    /// Named AWS credential profile used for SSO login. Not created here;
    /// it must already exist in ~/.aws/config.
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamoConfig {
    /// Target table for `devup load`.
    #[serde(default = "default_table")]
    pub table: String,
    /// Region the table lives in; independent of the SSO region.
    #[serde(default = "default_dynamo_region")]
    pub region: String,
}

fn default_table() -> String {
    "lms_assignments".to_string()
}

fn default_dynamo_region() -> String {
    "us-west-2".to_string()
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            region: default_dynamo_region(),
        }
    }
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/devup (if env var is set)
    /// 2. ~/.config/devup (if ~/.config exists)
    /// 3. ~/.devup (fallback on Unix, doesn't create ~/.config)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join("devup"));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join("devup"));
                }

                return Ok(home_dir.join(".devup"));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join("devup"));
            }
        }

        Err(BootstrapError::ConfigError(
            "Could not determine config directory".to_string(),
        ))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Parse a TOML config document.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from file, environment variables, and defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        let mut config = if config_path.exists() {
            tracing::debug!("Loading config from: {}", config_path.display());
            let contents = fs::read_to_string(&config_path).map_err(|e| {
                BootstrapError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            Self::parse(&contents)?
        } else {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            Config::default()
        };

        // Override with environment variables if set
        if let Ok(program) = std::env::var("DEVUP_PYTHON") {
            tracing::debug!("Using DEVUP_PYTHON from environment: {}", program);
            config.python.program = program;
        }

        Ok(config)
    }

    /// Parsed minimum interpreter version.
    pub fn minimum_version(&self) -> Result<PythonVersion> {
        self.python.minimum.parse()
    }

    /// Create a sample config file with comments
    pub fn create_sample() -> Result<()> {
        let config_dir = Self::config_dir()?;
        let config_path = Self::config_file_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                BootstrapError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        // Don't overwrite existing config
        if config_path.exists() {
            return Err(BootstrapError::ConfigError(format!(
                "Config file already exists at: {}",
                config_path.display()
            )));
        }

        let sample_config = r#"# devup configuration
# Location priority:
#   1. $XDG_CONFIG_HOME/devup/config.toml (if XDG_CONFIG_HOME is set)
#   2. ~/.config/devup/config.toml (if ~/.config exists)
#   3. ~/.devup/config.toml (fallback)

[python]
# Minimum interpreter version the project supports
minimum = "3.9"

# Interpreter used to probe the version and create the venv
# Can also be set via the DEVUP_PYTHON environment variable
program = "python3"

[paths]
# Requirements specification edited by hand (input)
requirements_in = "config/requirements.in"

# Pinned lock file regenerated on every run (output)
requirements_lock = "config/requirements.txt"

[aws]
# Named AWS profile for SSO login; must exist in ~/.aws/config
# Can also be set via --profile or the AWS_PROFILE environment variable
# Example: profile = "team-dev"

[dynamodb]
# Target table and region for `devup load`
table = "lms_assignments"
region = "us-west-2"
"#;

        fs::write(&config_path, sample_config).map_err(|e| {
            BootstrapError::ConfigError(format!("Failed to write sample config: {}", e))
        })?;

        println!("Created sample config file at: {}", config_path.display());
        println!("\nEdit it to set your AWS profile:");
        println!("  profile = \"team-dev\"");

        Ok(())
    }
}
