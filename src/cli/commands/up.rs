use crate::config::Config;
use crate::error::Result;
use crate::pipeline::Bootstrapper;
use crate::runner::ProcessRunner;
use std::path::PathBuf;

pub async fn execute(root: PathBuf, profile: Option<String>, skip_login: bool) -> Result<()> {
    let config = Config::load()?;
    let runner = ProcessRunner;

    let bootstrapper = Bootstrapper::new(config, &runner, root);
    let context = bootstrapper.run(profile, skip_login).await?;

    println!("✓ Environment ready");
    println!("  Python: {}", context.python_version);
    println!("  Venv:   {}", context.venv.dir.display());
    println!("  Lock:   {}", context.requirements_lock.display());

    Ok(())
}
