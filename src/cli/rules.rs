use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categorizer::explain;
use crate::error::Result;
use crate::mappings::RuleSet;
use crate::models::Transaction;
use crate::settings::{load_settings, shellexpand_path};

fn mapping_dir(over: Option<&str>) -> PathBuf {
    match over {
        Some(dir) => PathBuf::from(shellexpand_path(dir)),
        None => PathBuf::from(load_settings().mapping_dir),
    }
}

fn pattern_cell(pattern: &str) -> Cell {
    if pattern.is_empty() {
        Cell::new("(matches everything)".yellow())
    } else {
        Cell::new(pattern)
    }
}

pub fn list(mapping_dir_override: Option<&str>) -> Result<()> {
    let rules = RuleSet::load(&mapping_dir(mapping_dir_override))?;

    let mut table = Table::new();
    table.set_header(vec!["Table", "#", "Pattern", "Category"]);
    for rule_table in rules.tables() {
        for (i, rule) in rule_table.rules.iter().enumerate() {
            table.add_row(vec![
                Cell::new(rule_table.target.name()),
                Cell::new(i + 1),
                pattern_cell(&rule.pattern),
                Cell::new(&rule.category),
            ]);
        }
    }
    println!("Rules (applied top to bottom, later matches win)\n{table}");
    Ok(())
}

pub fn test(
    reference: Option<&str>,
    party: Option<&str>,
    mapping_dir_override: Option<&str>,
) -> Result<()> {
    let rules = RuleSet::load(&mapping_dir(mapping_dir_override))?;
    let txn = Transaction {
        purpose: reference.filter(|s| !s.is_empty()).map(str::to_string),
        counterparty: party.filter(|s| !s.is_empty()).map(str::to_string),
        ..Default::default()
    };

    let matched = explain(&txn, &rules);
    if matched.is_empty() {
        println!("{}", "No rule matches; the transaction stays uncategorized.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Table", "#", "Pattern", "Category"]);
    for m in &matched {
        table.add_row(vec![
            Cell::new(m.target.name()),
            Cell::new(m.row),
            pattern_cell(&m.rule.pattern),
            Cell::new(&m.rule.category),
        ]);
    }
    println!("Matching rules\n{table}");
    if let Some(last) = matched.last() {
        println!("Category: {}", last.rule.category.green().bold());
    }
    Ok(())
}
