// CLI interface
pub mod commands;

use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "devup")]
#[command(about = "Bootstrap a Python dev environment and AWS SSO session", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// AWS profile for SSO login
    #[arg(short, long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap the environment and log in (default when no command is given)
    Up {
        /// Prepare the environment but skip the SSO login
        #[arg(long)]
        skip_login: bool,
    },

    /// Run the AWS SSO login step only
    Login,

    /// Load an assignment CSV export into DynamoDB
    Load {
        /// The file containing csv data
        file: PathBuf,
    },

    /// Report the state of the bootstrapped environment
    Status {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Manage the devup config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completion scripts
    ///
    /// The script is written to stdout; an install hint for the chosen shell
    /// is written to stderr.
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create a sample config file
    Init,
    /// Show the config file path and whether it is valid
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

pub async fn execute(args: Cli) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match args.command {
        Some(Commands::Up { skip_login }) => {
            commands::up::execute(root, args.profile, skip_login).await
        }
        Some(Commands::Login) => commands::login::execute(args.profile).await,
        Some(Commands::Load { file }) => commands::load::execute(file).await,
        Some(Commands::Status { json }) => commands::status::execute(root, json).await,
        Some(Commands::Config { command }) => commands::config::execute(command).await,
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell);
            Ok(())
        }
        // No command specified: full bootstrap, the tool's whole point
        None => commands::up::execute(root, args.profile, false).await,
    }
}
