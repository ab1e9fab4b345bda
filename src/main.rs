// devup - Python dev environment bootstrapper with AWS SSO login

mod cli;
mod config;
mod deps;
mod error;
mod interpreter;
mod loader;
mod pipeline;
mod runner;
mod sso;
mod venv;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    // Initialize tracing based on verbose flag; logs go to stderr so the
    // user-facing prompts on stdout stay clean
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Every failure is terminal: print the diagnostic and stop
    if let Err(e) = cli::execute(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
