use std::path::{Path, PathBuf};

use crate::categorizer::categorize;
use crate::error::{BanksortError, Result};
use crate::importer::{read_raw_file, write_statement_file};
use crate::mappings::RuleSet;
use crate::normalizer::normalize;

/// Directories a batch run reads from and writes to.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mapping_dir: PathBuf,
}

impl BatchConfig {
    /// Check the input and mapping directories exist and make sure the
    /// output directory does.
    pub fn validate(&self) -> Result<()> {
        for (role, dir) in [("input", &self.input_dir), ("mapping", &self.mapping_dir)] {
            if !dir.is_dir() {
                return Err(BanksortError::InvalidDirectory {
                    role,
                    path: dir.display().to_string(),
                });
            }
        }
        std::fs::create_dir_all(&self.output_dir).map_err(|_| BanksortError::InvalidDirectory {
            role: "output",
            path: self.output_dir.display().to_string(),
        })?;
        Ok(())
    }

    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        match input.file_name() {
            Some(name) => self.output_dir.join(name),
            None => self.output_dir.join(input),
        }
    }
}

pub fn is_csv_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_lowercase().ends_with(".csv"))
}

/// CSV files directly inside `dir`, sorted by name so runs are reproducible.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_csv_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[derive(Debug)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub categorized: usize,
    pub uncategorized: usize,
}

#[derive(Debug)]
pub struct SkippedFile {
    pub input: PathBuf,
    pub error: BanksortError,
}

#[derive(Debug)]
pub enum FileOutcome {
    Processed(ProcessedFile),
    Skipped(SkippedFile),
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    /// One entry per candidate file, in processing order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Processed(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.processed()
    }

    /// A run fails only when there were files and none of them went through.
    pub fn is_success(&self) -> bool {
        self.outcomes.is_empty() || self.processed() > 0
    }
}

/// Normalize, categorize and write one statement.
pub fn process_file(input: &Path, output: &Path, rules: &RuleSet) -> Result<ProcessedFile> {
    let raw = read_raw_file(input)?;
    let mut statement = normalize(&raw)?;
    let result = categorize(&mut statement, rules);
    write_statement_file(output, &statement)?;

    Ok(ProcessedFile {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        rows: statement.transactions.len(),
        categorized: result.categorized,
        uncategorized: result.uncategorized,
    })
}

/// Process every CSV file in the input directory.
///
/// Mapping tables are loaded once up front; failing to load them aborts the
/// run before any file is touched. Errors inside a single file are recorded
/// and the batch moves on to the next one.
pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary> {
    config.validate()?;
    let rules = RuleSet::load(&config.mapping_dir)?;
    tracing::info!(rules = rules.rule_count(), "mapping tables loaded");

    let files = list_input_files(&config.input_dir)?;
    let mut summary = BatchSummary::default();

    for input in files {
        let output = config.output_path_for(&input);
        match process_file(&input, &output, &rules) {
            Ok(done) => {
                tracing::info!(
                    rows = done.rows,
                    categorized = done.categorized,
                    "processed {} -> {}",
                    input.display(),
                    output.display()
                );
                summary.outcomes.push(FileOutcome::Processed(done));
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(error) => {
                tracing::warn!("skipping {}: {error}", input.display());
                summary
                    .outcomes
                    .push(FileOutcome::Skipped(SkippedFile { input, error }));
            }
        }
    }

    Ok(summary)
}
