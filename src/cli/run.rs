use colored::Colorize;

use crate::batch::{run_batch, FileOutcome};
use crate::cli::DirArgs;
use crate::error::{BanksortError, Result};
use crate::settings::load_settings;

pub fn run(dirs: &DirArgs) -> Result<()> {
    let settings = load_settings().with_overrides(
        dirs.input_dir.as_deref(),
        dirs.output_dir.as_deref(),
        dirs.mapping_dir.as_deref(),
    );
    let config = settings.batch_config();
    let summary = run_batch(&config)?;

    for outcome in &summary.outcomes {
        match outcome {
            FileOutcome::Processed(done) => println!(
                "Processed: {} \u{2192} {} ({} rows, {} categorized, {} uncategorized)",
                done.input.display(),
                done.output.display(),
                done.rows,
                done.categorized,
                done.uncategorized
            ),
            FileOutcome::Skipped(skip) => match &skip.error {
                BanksortError::MissingColumn(_) => eprintln!(
                    "{} {}: {}",
                    "Skipping".yellow(),
                    skip.input.display(),
                    skip.error
                ),
                _ => eprintln!(
                    "{} {}: {}",
                    "Error processing".red(),
                    skip.input.display(),
                    skip.error
                ),
            },
        }
    }

    if summary.outcomes.is_empty() {
        println!("No CSV files found in {}", config.input_dir.display());
        return Ok(());
    }

    println!("{} processed, {} skipped", summary.processed(), summary.skipped());
    if !summary.is_success() {
        return Err(BanksortError::Other(format!(
            "none of the {} files in {} could be processed",
            summary.outcomes.len(),
            config.input_dir.display()
        )));
    }
    Ok(())
}
