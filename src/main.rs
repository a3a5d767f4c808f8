mod batch;
mod categorizer;
mod cli;
mod error;
mod fmt;
mod importer;
mod mappings;
mod models;
mod normalizer;
mod reports;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, RulesCommands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { dirs } => cli::init::run(&dirs),
        Commands::Run { dirs } => cli::run::run(&dirs),
        Commands::Rules { command } => match command {
            RulesCommands::List { mapping_dir } => cli::rules::list(mapping_dir.as_deref()),
            RulesCommands::Test {
                reference,
                party,
                mapping_dir,
            } => cli::rules::test(reference.as_deref(), party.as_deref(), mapping_dir.as_deref()),
        },
        Commands::Report { dir, file, top } => {
            cli::report::run(dir.as_deref(), file.as_deref(), top)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
