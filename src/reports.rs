use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::error::Result;
use crate::fmt::parse_amount;
use crate::importer::read_raw_file;
use crate::models::{Column, CATEGORY_HEADER};

/// Rows listed in the uncategorized section, largest amounts first.
pub const UNCATEGORIZED_LIMIT: usize = 25;

// ---------------------------------------------------------------------------
// Loading processed statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: Option<NaiveDate>,
    pub counterparty: Option<String>,
    pub purpose: Option<String>,
    pub amount: f64,
    pub balance: Option<f64>,
    pub category: Option<String>,
}

impl ReportRow {
    fn month(&self) -> Option<(i32, u32)> {
        self.date.map(|d| (d.year(), d.month()))
    }

    fn is_uncategorized(&self) -> bool {
        self.category.as_deref().map_or(true, |c| c.trim().is_empty())
    }
}

/// Read a file written by the batch run. Missing columns read as absent;
/// unparseable amounts count as zero.
pub fn load_processed(path: &Path) -> Result<Vec<ReportRow>> {
    let raw = read_raw_file(path)?;
    let idx = |name: &str| raw.column_index(name);
    let date_idx = idx(Column::BookingDate.header());
    let party_idx = idx(Column::Counterparty.header());
    let purpose_idx = idx(Column::Purpose.header());
    let amount_idx = idx(Column::Amount.header());
    let balance_idx = idx(Column::Balance.header());
    let category_idx = idx(CATEGORY_HEADER);

    let rows = raw
        .rows
        .iter()
        .map(|row| {
            let cell = |i: Option<usize>| i.and_then(|i| row[i].clone());
            ReportRow {
                date: cell(date_idx)
                    .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
                counterparty: cell(party_idx),
                purpose: cell(purpose_idx),
                amount: cell(amount_idx).and_then(|a| parse_amount(&a)).unwrap_or(0.0),
                balance: cell(balance_idx).and_then(|b| parse_amount(&b)),
                category: cell(category_idx),
            }
        })
        .collect();
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

/// Mean of the last known balance of each month, in booking order.
pub fn average_month_end_balance(rows: &[ReportRow]) -> Option<f64> {
    let mut dated: Vec<&ReportRow> = rows
        .iter()
        .filter(|r| r.date.is_some() && r.balance.is_some())
        .collect();
    dated.sort_by_key(|r| r.date);

    let mut month_end: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for row in dated {
        if let (Some(month), Some(balance)) = (row.month(), row.balance) {
            month_end.insert(month, balance);
        }
    }
    if month_end.is_empty() {
        return None;
    }
    Some(month_end.values().sum::<f64>() / month_end.len() as f64)
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

pub struct VendorTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

/// Counterparties ranked by absolute total amount.
pub fn top_vendors(rows: &[ReportRow], limit: usize) -> Vec<VendorTotal> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        if let Some(name) = row.counterparty.as_deref() {
            let entry = totals.entry(name).or_default();
            entry.0 += row.amount;
            entry.1 += 1;
        }
    }
    let mut vendors: Vec<VendorTotal> = totals
        .into_iter()
        .map(|(name, (total, count))| VendorTotal {
            name: name.to_string(),
            total,
            count,
        })
        .collect();
    vendors.sort_by(|a, b| b.total.abs().total_cmp(&a.total.abs()));
    vendors.truncate(limit);
    vendors
}

// ---------------------------------------------------------------------------
// Cash flow
// ---------------------------------------------------------------------------

pub struct MonthFlow {
    pub month: String,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
}

pub fn monthly_cash_flow(rows: &[ReportRow]) -> Vec<MonthFlow> {
    let mut months: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for row in rows {
        let Some(month) = row.month() else { continue };
        let entry = months.entry(month).or_default();
        if row.amount > 0.0 {
            entry.0 += row.amount;
        } else {
            entry.1 += row.amount;
        }
    }
    months
        .into_iter()
        .map(|((y, m), (inflow, outflow))| MonthFlow {
            month: format!("{y:04}-{m:02}"),
            inflow,
            outflow,
            net: inflow + outflow,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub struct CategoryStats {
    pub name: String,
    pub total: f64,
    pub avg_monthly: f64,
    pub largest: f64,
    pub count: usize,
}

/// Per-category totals, sorted by category name.
pub fn category_summary(rows: &[ReportRow]) -> Vec<CategoryStats> {
    let mut by_category: BTreeMap<&str, Vec<&ReportRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.is_uncategorized()) {
        if let Some(name) = row.category.as_deref() {
            by_category.entry(name).or_default().push(row);
        }
    }

    by_category
        .into_iter()
        .map(|(name, members)| {
            let mut per_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
            for row in &members {
                if let Some(month) = row.month() {
                    *per_month.entry(month).or_default() += row.amount;
                }
            }
            let avg_monthly = if per_month.is_empty() {
                0.0
            } else {
                per_month.values().sum::<f64>() / per_month.len() as f64
            };
            CategoryStats {
                name: name.to_string(),
                total: members.iter().map(|r| r.amount).sum(),
                avg_monthly,
                largest: members.iter().map(|r| r.amount.abs()).fold(0.0, f64::max),
                count: members.len(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Full analysis
// ---------------------------------------------------------------------------

pub struct Analysis {
    pub month_end_balance: Option<f64>,
    pub top_vendors: Vec<VendorTotal>,
    pub cash_flow: Vec<MonthFlow>,
    pub uncategorized_count: usize,
    pub uncategorized: Vec<ReportRow>,
    pub categories: Vec<CategoryStats>,
}

pub fn analyze(rows: &[ReportRow], vendor_limit: usize) -> Analysis {
    let mut uncategorized: Vec<ReportRow> =
        rows.iter().filter(|r| r.is_uncategorized()).cloned().collect();
    let uncategorized_count = uncategorized.len();
    uncategorized.sort_by(|a, b| b.amount.abs().total_cmp(&a.amount.abs()));
    uncategorized.truncate(UNCATEGORIZED_LIMIT);

    Analysis {
        month_end_balance: average_month_end_balance(rows),
        top_vendors: top_vendors(rows, vendor_limit),
        cash_flow: monthly_cash_flow(rows),
        uncategorized_count,
        uncategorized,
        categories: category_summary(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, party: &str, amount: f64, balance: f64, category: &str) -> ReportRow {
        ReportRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            counterparty: (!party.is_empty()).then(|| party.to_string()),
            purpose: None,
            amount,
            balance: Some(balance),
            category: (!category.is_empty()).then(|| category.to_string()),
        }
    }

    fn sample() -> Vec<ReportRow> {
        vec![
            row("2024-01-31", "Arbeitgeber", 3000.0, 3500.0, "Gehalt"),
            row("2024-01-05", "REWE", -50.0, 500.0, "Lebensmittel"),
            row("2024-01-20", "REWE", -30.0, 470.0, "Lebensmittel"),
            row("2024-02-03", "Vermieter", -1200.0, 2300.0, ""),
            row("2024-02-10", "REWE", -20.0, 2280.0, "Lebensmittel"),
            row("", "Unbekannt", -5.0, 0.0, ""),
        ]
    }

    #[test]
    fn test_average_month_end_balance_uses_last_booking_per_month() {
        // January ends at 3500 (31st), February at 2280.
        assert_eq!(average_month_end_balance(&sample()), Some((3500.0 + 2280.0) / 2.0));
        assert_eq!(average_month_end_balance(&[]), None);
    }

    #[test]
    fn test_top_vendors_ranked_by_absolute_total() {
        let vendors = top_vendors(&sample(), 2);
        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[0].name, "Arbeitgeber");
        assert_eq!(vendors[1].name, "Vermieter");
        let rewe = top_vendors(&sample(), 10).into_iter().find(|v| v.name == "REWE").unwrap();
        assert_eq!(rewe.total, -100.0);
        assert_eq!(rewe.count, 3);
    }

    #[test]
    fn test_monthly_cash_flow() {
        let flow = monthly_cash_flow(&sample());
        assert_eq!(flow.len(), 2);
        assert_eq!(flow[0].month, "2024-01");
        assert_eq!(flow[0].inflow, 3000.0);
        assert_eq!(flow[0].outflow, -80.0);
        assert_eq!(flow[0].net, 2920.0);
        assert_eq!(flow[1].month, "2024-02");
        assert_eq!(flow[1].outflow, -1220.0);
    }

    #[test]
    fn test_category_summary() {
        let stats = category_summary(&sample());
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Gehalt", "Lebensmittel"]);
        let food = &stats[1];
        assert_eq!(food.total, -100.0);
        assert_eq!(food.avg_monthly, -50.0);
        assert_eq!(food.largest, 50.0);
        assert_eq!(food.count, 3);
    }

    #[test]
    fn test_analyze_lists_uncategorized_by_size() {
        let analysis = analyze(&sample(), 10);
        assert_eq!(analysis.uncategorized_count, 2);
        assert_eq!(analysis.uncategorized[0].amount, -1200.0);
        assert_eq!(analysis.uncategorized[1].amount, -5.0);
    }

    #[test]
    fn test_load_processed_reads_batch_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(
            &path,
            "Buchungstag;Name Zahlungsbeteiligter;Betrag;Saldo nach Buchung;Category\n\
             2024-01-05;REWE;-50,00;1.450,00;Lebensmittel\n\
             ;Bank;-1,00;;\n",
        )
        .unwrap();
        let rows = load_processed(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(rows[0].balance, Some(1450.0));
        assert_eq!(rows[0].category.as_deref(), Some("Lebensmittel"));
        assert_eq!(rows[1].date, None);
        assert_eq!(rows[1].balance, None);
        assert!(rows[1].is_uncategorized());
        assert_eq!(rows[1].purpose, None);
    }
}
