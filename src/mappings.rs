use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{BanksortError, Result};
use crate::importer::read_raw_table;
use crate::models::{Column, MappingRule, ABSENT, CATEGORY_HEADER};

/// Which transaction field a mapping table is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    ReferenceText,
    PaymentParty,
}

impl RuleTarget {
    /// Application order: payment-party rules run last and win.
    pub const ALL: [RuleTarget; 2] = [RuleTarget::ReferenceText, RuleTarget::PaymentParty];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ReferenceText => "reference_text",
            Self::PaymentParty => "payment_party",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReferenceText => "Reference text",
            Self::PaymentParty => "Payment party",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::ReferenceText => "reference-text.config.csv",
            Self::PaymentParty => "payment-party.config.csv",
        }
    }

    pub fn column(&self) -> Column {
        match self {
            Self::ReferenceText => Column::Purpose,
            Self::PaymentParty => Column::Counterparty,
        }
    }

    pub fn path_in(&self, mapping_dir: &Path) -> PathBuf {
        mapping_dir.join(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    pub target: RuleTarget,
    pub rules: Vec<MappingRule>,
}

/// Both mapping tables, loaded once per run and shared by every file.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub reference_text: RuleTable,
    pub payment_party: RuleTable,
}

impl RuleSet {
    pub fn load(mapping_dir: &Path) -> Result<RuleSet> {
        Ok(RuleSet {
            reference_text: load_table(mapping_dir, RuleTarget::ReferenceText)?,
            payment_party: load_table(mapping_dir, RuleTarget::PaymentParty)?,
        })
    }

    /// Tables in the order they are applied.
    pub fn tables(&self) -> [&RuleTable; 2] {
        [&self.reference_text, &self.payment_party]
    }

    pub fn rule_count(&self) -> usize {
        self.reference_text.rules.len() + self.payment_party.rules.len()
    }
}

/// Parse a mapping table. Row order is kept; patterns and categories are
/// trimmed and otherwise taken as-is, so a whitespace-only pattern becomes an
/// empty rule that matches everything. Empty cells read as [`ABSENT`].
pub fn parse_table<R: Read>(reader: R, target: RuleTarget) -> Result<RuleTable> {
    let raw = read_raw_table(reader)?;
    let pattern_header = target.column().header();
    let pattern_idx = raw
        .column_index(pattern_header)
        .ok_or_else(|| BanksortError::MissingColumn(pattern_header.to_string()))?;
    let category_idx = raw
        .column_index(CATEGORY_HEADER)
        .ok_or_else(|| BanksortError::MissingColumn(CATEGORY_HEADER.to_string()))?;

    let cell = |row: &[Option<String>], idx: usize| -> String {
        row[idx].as_deref().unwrap_or(ABSENT).trim().to_string()
    };
    let rules = raw
        .rows
        .iter()
        .map(|row| MappingRule {
            pattern: cell(row, pattern_idx),
            category: cell(row, category_idx),
        })
        .collect();

    Ok(RuleTable { target, rules })
}

/// Load one mapping table from `mapping_dir`. Any failure is a
/// [`BanksortError::ConfigLoad`] naming the file.
pub fn load_table(mapping_dir: &Path, target: RuleTarget) -> Result<RuleTable> {
    let path = target.path_in(mapping_dir);
    let config_error = |reason: String| BanksortError::ConfigLoad {
        path: path.display().to_string(),
        reason,
    };

    let file = std::fs::File::open(&path).map_err(|e| config_error(e.to_string()))?;
    let table = parse_table(std::io::BufReader::new(file), target)
        .map_err(|e| config_error(e.to_string()))?;

    tracing::debug!(
        table = target.key(),
        rules = table.rules.len(),
        "loaded mapping table from {}",
        path.display()
    );
    Ok(table)
}

/// Header line of an empty mapping table, used by `init`.
pub fn template_header(target: RuleTarget) -> String {
    format!("{};{}\n", target.column().header(), CATEGORY_HEADER)
}
