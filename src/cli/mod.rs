pub mod init;
pub mod report;
pub mod rules;
pub mod run;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "banksort",
    version,
    about = "Normalize bank-statement CSV exports and categorize them with mapping rules."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Directory overrides shared by commands that touch the batch layout.
#[derive(Args, Debug, Default)]
pub struct DirArgs {
    /// Directory scanned for bank exports (*.csv)
    #[arg(long = "input-dir")]
    pub input_dir: Option<String>,
    /// Directory processed files are written to
    #[arg(long = "output-dir")]
    pub output_dir: Option<String>,
    /// Directory holding reference-text.config.csv and payment-party.config.csv
    #[arg(long = "mapping-dir")]
    pub mapping_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save default directories, create them and write empty mapping tables.
    Init {
        #[command(flatten)]
        dirs: DirArgs,
    },
    /// Normalize and categorize every CSV file in the input directory.
    Run {
        #[command(flatten)]
        dirs: DirArgs,
    },
    /// Inspect the mapping tables.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Summarize processed statements.
    Report {
        /// Directory of processed files (default: the configured output directory)
        #[arg(long)]
        dir: Option<String>,
        /// Analyze a single processed file instead of a whole directory
        #[arg(long)]
        file: Option<String>,
        /// Number of counterparties in the vendor ranking
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// List both mapping tables in application order.
    List {
        #[arg(long = "mapping-dir")]
        mapping_dir: Option<String>,
    },
    /// Show which rules match a transaction and the category it ends up with.
    Test {
        /// Purpose/reference text (Verwendungszweck)
        #[arg(long)]
        reference: Option<String>,
        /// Counterparty name (Name Zahlungsbeteiligter)
        #[arg(long)]
        party: Option<String>,
        #[arg(long = "mapping-dir")]
        mapping_dir: Option<String>,
    },
}
