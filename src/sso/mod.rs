// AWS SSO credential bootstrap
//
// Authentication itself is the aws CLI's problem; this module only scopes the
// login to a profile and walks the user through the access-portal handoff.

use crate::config::Config;
use crate::error::{BootstrapError, Result};
use crate::runner::{CommandRunner, CommandSpec};
use std::time::Duration;

/// Fixed pause between the portal instructions and the final prompt, giving
/// the user time to read before the next line scrolls in.
const PORTAL_PAUSE: Duration = Duration::from_secs(10);

/// Resolve the AWS profile name.
///
/// Priority:
/// 1. --profile flag or AWS_PROFILE environment variable (via clap)
/// 2. [aws] profile in the config file
pub fn resolve_profile(profile_arg: Option<String>, config: &Config) -> Result<String> {
    if let Some(profile) = profile_arg {
        return Ok(profile);
    }

    config.aws.profile.clone().ok_or_else(|| {
        BootstrapError::ConfigError(
            "AWS profile not configured. Use --profile, set the AWS_PROFILE environment \
             variable, or set [aws] profile in the config file"
                .to_string(),
        )
    })
}

/// Run `aws sso login` scoped to the profile, then prompt the user to paste
/// temporary credentials obtained from the access portal.
///
/// AWS_PROFILE is exported into the child's environment in addition to the
/// --profile flag, matching what the aws CLI expects from a configured shell.
pub async fn login(runner: &dyn CommandRunner, profile: &str) -> Result<()> {
    println!("Logging in to AWS SSO with profile '{}'...", profile);

    let spec = CommandSpec::new("aws")
        .args(["sso", "login", "--profile"])
        .arg(profile)
        .env("AWS_PROFILE", profile);

    let output = runner
        .run(&spec)
        .map_err(|e| BootstrapError::SsoLoginFailed(e.to_string()))?;

    if !output.success {
        return Err(BootstrapError::SsoLoginFailed(format!(
            "aws sso login exited with an error for profile '{}'",
            profile
        )));
    }

    println!("✓ SSO login complete");
    println!();
    println!("Open the AWS access portal, select the account behind profile '{}',", profile);
    println!("and copy the temporary credentials under \"Command line or programmatic access\".");

    tokio::time::sleep(PORTAL_PAUSE).await;

    println!("Paste the credentials into this terminal to finish setting up your session.");
    Ok(())
}
