use crate::config::Config;
use crate::error::{BootstrapError, Result};
use crate::loader;
use crate::runner::ProcessRunner;
use std::path::PathBuf;

pub async fn execute(file: PathBuf) -> Result<()> {
    if !file.is_file() {
        return Err(BootstrapError::DataLoad(format!(
            "{} does not exist",
            file.display()
        )));
    }
    if file.extension().map(|ext| ext != "csv").unwrap_or(true) {
        return Err(BootstrapError::DataLoad(format!(
            "{} is not a csv file",
            file.display()
        )));
    }

    let config = Config::load()?;
    let runner = ProcessRunner;

    let report = loader::load_csv(&runner, &config.dynamodb, &file)?;

    println!(
        "✓ Loaded {} items into {} in {}s",
        report.items_written, config.dynamodb.table, report.elapsed_seconds
    );
    if report.rows_skipped > 0 {
        println!("  Skipped {} rows", report.rows_skipped);
    }

    Ok(())
}
