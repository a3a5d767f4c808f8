use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::batch::list_input_files;
use crate::error::{BanksortError, Result};
use crate::fmt::money;
use crate::reports::{self, Analysis};
use crate::settings::{load_settings, shellexpand_path};

fn colored_money(val: f64) -> String {
    if val < 0.0 {
        money(val).red().to_string()
    } else {
        money(val).green().to_string()
    }
}

pub fn run(dir: Option<&str>, file: Option<&str>, top: usize) -> Result<()> {
    let files = match (file, dir) {
        (Some(f), _) => vec![PathBuf::from(shellexpand_path(f))],
        (None, Some(d)) => list_input_files(Path::new(&shellexpand_path(d)))?,
        (None, None) => list_input_files(Path::new(&load_settings().output_dir))?,
    };

    if files.is_empty() {
        println!("No processed files found.");
        return Ok(());
    }

    let mut failed = 0;
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let rows = match reports::load_processed(path) {
            Ok(rows) => rows,
            Err(e) => {
                eprintln!("{} {name}: {e}", "Error reading".red());
                failed += 1;
                continue;
            }
        };
        let analysis = reports::analyze(&rows, top);
        println!("{}", format!("Analysis for {name}").bold());
        print_analysis(&analysis, top);
        println!();
    }

    if failed == files.len() {
        return Err(BanksortError::Other(format!(
            "none of the {failed} processed file(s) could be read"
        )));
    }
    Ok(())
}

fn print_analysis(analysis: &Analysis, top: usize) {
    match analysis.month_end_balance {
        Some(avg) => println!("\nAverage end-of-month balance: {}", money(avg)),
        None => println!("\nAverage end-of-month balance: (no dated balances)"),
    }

    if !analysis.top_vendors.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Counterparty", "Total", "Count"]);
        for v in &analysis.top_vendors {
            table.add_row(vec![
                Cell::new(&v.name),
                Cell::new(colored_money(v.total)),
                Cell::new(v.count),
            ]);
        }
        println!("\nTop {top} counterparties by total\n{table}");
    }

    if !analysis.cash_flow.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Inflow", "Outflow", "Difference"]);
        for m in &analysis.cash_flow {
            table.add_row(vec![
                Cell::new(&m.month),
                Cell::new(money(m.inflow)),
                Cell::new(money(m.outflow)),
                Cell::new(colored_money(m.net)),
            ]);
        }
        println!("\nMonthly cash flow\n{table}");
    }

    println!(
        "\nTransactions without category: {}",
        analysis.uncategorized_count.to_string().yellow()
    );
    if !analysis.uncategorized.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Counterparty", "Purpose", "Amount"]);
        for r in &analysis.uncategorized {
            table.add_row(vec![
                Cell::new(r.counterparty.as_deref().unwrap_or("")),
                Cell::new(r.purpose.as_deref().unwrap_or("")),
                Cell::new(money(r.amount)),
            ]);
        }
        println!("Largest uncategorized transactions\n{table}");
    }

    if !analysis.categories.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Total", "Avg / month", "Largest", "Count"]);
        for c in &analysis.categories {
            table.add_row(vec![
                Cell::new(&c.name),
                Cell::new(colored_money(c.total)),
                Cell::new(money(c.avg_monthly)),
                Cell::new(money(c.largest)),
                Cell::new(c.count),
            ]);
        }
        println!("\nCategories\n{table}");
    }
}
