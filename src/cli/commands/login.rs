use crate::config::Config;
use crate::error::Result;
use crate::runner::ProcessRunner;
use crate::sso;

pub async fn execute(profile: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let profile = sso::resolve_profile(profile, &config)?;

    let runner = ProcessRunner;
    sso::login(&runner, &profile).await
}
