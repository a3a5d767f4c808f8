use crate::mappings::{RuleSet, RuleTable, RuleTarget};
use crate::models::{MappingRule, Statement, Transaction};

/// Case-insensitive literal containment. `text` and `pattern` are upper-cased
/// before comparison; no character in the pattern is special.
pub fn matches(text: &str, pattern: &str) -> bool {
    text.to_uppercase().contains(&pattern.to_uppercase())
}

pub struct CategorizeResult {
    pub categorized: usize,
    pub uncategorized: usize,
}

/// Apply every rule of one table, in row order, to every transaction.
/// A match overwrites whatever category the row had, so the last matching
/// rule wins.
pub fn apply_table(transactions: &mut [Transaction], table: &RuleTable) {
    let column = table.target.column();
    let haystacks: Vec<String> = transactions
        .iter()
        .map(|t| t.match_text(column).to_uppercase())
        .collect();

    for rule in &table.rules {
        let needle = rule.pattern.to_uppercase();
        let mut hits = 0usize;
        for (txn, text) in transactions.iter_mut().zip(&haystacks) {
            if text.contains(&needle) {
                txn.category = Some(rule.category.clone());
                hits += 1;
            }
        }
        tracing::trace!(
            table = table.target.key(),
            pattern = %rule.pattern,
            hits,
            "applied rule"
        );
    }
}

/// Resolve categories for a whole statement: reference-text rules first,
/// then payment-party rules, which override on rows matched by both.
pub fn categorize(statement: &mut Statement, rules: &RuleSet) -> CategorizeResult {
    for table in rules.tables() {
        apply_table(&mut statement.transactions, table);
    }

    let categorized = statement
        .transactions
        .iter()
        .filter(|t| t.category.as_deref().is_some_and(|c| !c.is_empty()))
        .count();

    CategorizeResult {
        categorized,
        uncategorized: statement.transactions.len() - categorized,
    }
}

/// A rule that matched a transaction, with its 1-based row in its table.
pub struct RuleMatch<'a> {
    pub target: RuleTarget,
    pub row: usize,
    pub rule: &'a MappingRule,
}

/// Every rule that matches `txn`, in application order. The last entry is
/// the one that decides the category.
pub fn explain<'a>(txn: &Transaction, rules: &'a RuleSet) -> Vec<RuleMatch<'a>> {
    let mut matched = Vec::new();
    for table in rules.tables() {
        let text = txn.match_text(table.target.column());
        for (i, rule) in table.rules.iter().enumerate() {
            if matches(text, &rule.pattern) {
                matched.push(RuleMatch {
                    target: table.target,
                    row: i + 1,
                    rule,
                });
            }
        }
    }
    matched
}
