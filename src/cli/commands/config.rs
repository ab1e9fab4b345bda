use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::Result;

pub async fn execute(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            Config::create_sample()?;
        }
        ConfigCommand::Path => {
            let config_path = Config::config_file_path()?;
            println!("Config file path: {}", config_path.display());

            if config_path.exists() {
                println!("Status: File exists");

                match Config::load() {
                    Ok(config) => {
                        println!("Valid: Yes");
                        println!("\nEffective configuration:");
                        println!("  Minimum Python: {}", config.python.minimum);
                        println!("  Interpreter:    {}", config.python.program);
                        println!(
                            "  Requirements:   {} -> {}",
                            config.paths.requirements_in.display(),
                            config.paths.requirements_lock.display()
                        );
                        match config.aws.profile {
                            Some(profile) => println!("  AWS profile:    {}", profile),
                            None => println!("  AWS profile:    not configured"),
                        }
                    }
                    Err(e) => {
                        println!("Valid: No");
                        println!("Error: {}", e);
                    }
                }
            } else {
                println!("Status: File does not exist");
                println!("\nTo create a sample config file, run:");
                println!("  devup config init");
            }
        }
    }

    Ok(())
}
