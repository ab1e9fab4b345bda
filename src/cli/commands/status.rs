use crate::config::Config;
use crate::error::Result;
use crate::interpreter;
use crate::runner::ProcessRunner;
use crate::venv::{self, VenvPaths};
use std::fs;
use std::path::PathBuf;

pub async fn execute(root: PathBuf, json: bool) -> Result<()> {
    let config = Config::load()?;
    let minimum = config.minimum_version()?;

    let runner = ProcessRunner;
    let python = interpreter::probe(&runner, &config.python.program).ok();
    let python_ok = python.map(|v| v >= minimum).unwrap_or(false);

    let venv_dir = root.join(venv::dir_name(minimum));
    let venv_ready = VenvPaths::new(venv_dir.clone()).python.exists();

    let requirements_in = root.join(&config.paths.requirements_in);
    let lock_file = root.join(&config.paths.requirements_lock);

    let lock_age_minutes = fs::metadata(&lock_file)
        .and_then(|m| m.modified())
        .ok()
        .map(chrono::DateTime::<chrono::Utc>::from)
        .map(|modified| (chrono::Utc::now() - modified).num_minutes());

    let ready = python_ok && venv_ready && requirements_in.exists() && lock_file.exists();

    if json {
        let report = serde_json::json!({
            "ready": ready,
            "python": python.map(|v| v.to_string()),
            "python_ok": python_ok,
            "minimum": minimum.to_string(),
            "venv_dir": venv_dir,
            "venv_ready": venv_ready,
            "requirements_in_present": requirements_in.exists(),
            "lock_file_present": lock_file.exists(),
            "lock_age_minutes": lock_age_minutes,
            "profile": config.aws.profile,
        });
        println!("{}", serde_json::to_string(&report)?);
    } else {
        match python {
            Some(version) if python_ok => {
                println!("Python:   {} (minimum {})", version, minimum)
            }
            Some(version) => println!("Python:   {} (below minimum {})", version, minimum),
            None => println!("Python:   not found ({})", config.python.program),
        }

        if venv_ready {
            println!("Venv:     {} (ready)", venv_dir.display());
        } else {
            println!("Venv:     {} (missing)", venv_dir.display());
        }

        if requirements_in.exists() {
            println!("Input:    {}", requirements_in.display());
        } else {
            println!("Input:    {} (missing)", requirements_in.display());
        }

        match lock_age_minutes {
            Some(age) => println!("Lock:     {} (regenerated {}m ago)", lock_file.display(), age),
            None => println!("Lock:     {} (missing)", lock_file.display()),
        }

        match &config.aws.profile {
            Some(profile) => println!("Profile:  {}", profile),
            None => println!("Profile:  not configured"),
        }

        if ready {
            println!("\nEnvironment is ready. Run 'devup login' to refresh credentials.");
        } else {
            println!("\nEnvironment is not ready. Run 'devup' to bootstrap it.");
        }
    }

    if !ready {
        std::process::exit(1);
    }
    Ok(())
}
