use chrono::NaiveDate;

use crate::error::{BanksortError, Result};
use crate::models::{Column, RawTable, Statement, Transaction};

/// The only column a statement cannot be processed without.
pub const REQUIRED_COLUMN: Column = Column::BookingDate;

const SOURCE_DATE_FORMAT: &str = "%d.%m.%Y";
const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Reformat a `DD.MM.YYYY` booking date as `YYYY-MM-DD`.
/// Anything else, including two-digit years and impossible dates, is `None`.
pub fn normalize_date(raw: &str) -> Option<String> {
    if !has_source_date_shape(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, SOURCE_DATE_FORMAT)
        .ok()
        .map(|d| d.format(OUTPUT_DATE_FORMAT).to_string())
}

/// `D.M.YYYY` with one or two digit day and month and nothing else, since
/// chrono alone would accept padding whitespace and longer years.
fn has_source_date_shape(raw: &str) -> bool {
    let parts: Vec<&str> = raw.split('.').collect();
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    matches!(
        parts.as_slice(),
        [day, month, year]
            if (1..=2).contains(&day.len())
                && (1..=2).contains(&month.len())
                && year.len() == 4
                && digits(day)
                && digits(month)
                && digits(year)
    )
}

/// Project a raw table onto the column allow-list and reformat its dates.
///
/// The kept columns are the allow-list entries present in the header, in
/// allow-list order. Every row starts out uncategorized.
pub fn normalize(raw: &RawTable) -> Result<Statement> {
    if raw.column_index(REQUIRED_COLUMN.header()).is_none() {
        return Err(BanksortError::MissingColumn(REQUIRED_COLUMN.header().to_string()));
    }

    let projection: Vec<(Column, usize)> = Column::ALL
        .iter()
        .filter_map(|c| raw.column_index(c.header()).map(|idx| (*c, idx)))
        .collect();

    let transactions = raw
        .rows
        .iter()
        .map(|row| {
            let mut txn = Transaction::default();
            for (column, idx) in &projection {
                let value = row.get(*idx).cloned().flatten();
                *txn.field_mut(*column) = match column {
                    Column::BookingDate => value.as_deref().and_then(normalize_date),
                    _ => value,
                };
            }
            txn
        })
        .collect();

    Ok(Statement {
        columns: projection.into_iter().map(|(c, _)| c).collect(),
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("05.03.2023"), Some("2023-03-05".to_string()));
        assert_eq!(normalize_date("31.12.1999"), Some("1999-12-31".to_string()));
        assert_eq!(normalize_date("not-a-date"), None);
        assert_eq!(normalize_date("2023-03-05"), None);
        assert_eq!(normalize_date("05.03.23"), None);
        assert_eq!(normalize_date("30.02.2024"), None); // Feb 30
        assert_eq!(normalize_date("05/03/2023"), None);
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("5.3.2023"), Some("2023-03-05".to_string()));
    }

    #[test]
    fn test_normalize_date_rejects_padding_and_odd_shapes() {
        assert_eq!(normalize_date(" 05.03.2023"), None);
        assert_eq!(normalize_date("05. 03.2023"), None);
        assert_eq!(normalize_date("05.03. 2023"), None);
        assert_eq!(normalize_date("05.03.2023 "), None);
        assert_eq!(normalize_date("005.03.2023"), None);
        assert_eq!(normalize_date("05.03.02023"), None);
        assert_eq!(normalize_date("+5.03.2023"), None);
        assert_eq!(normalize_date("05.03.2023.1"), None);
    }

    #[test]
    fn test_missing_booking_date_is_schema_error() {
        let table = raw(&["Betrag", "Verwendungszweck"], &[&["1,00", "x"]]);
        let err = normalize(&table).unwrap_err();
        assert!(matches!(err, BanksortError::MissingColumn(ref c) if c == "Buchungstag"));
    }

    #[test]
    fn test_projection_follows_allow_list_order() {
        let table = raw(
            &["Waehrung", "IBAN", "Betrag", "Buchungstag", "Verwendungszweck"],
            &[&["EUR", "DE00", "-9,99", "05.03.2023", "NETFLIX.COM BILLING"]],
        );
        let statement = normalize(&table).unwrap();
        assert_eq!(
            statement.columns,
            vec![Column::BookingDate, Column::Purpose, Column::Amount, Column::Currency]
        );
        let txn = &statement.transactions[0];
        assert_eq!(txn.booking_date.as_deref(), Some("2023-03-05"));
        assert_eq!(txn.amount.as_deref(), Some("-9,99"));
        assert_eq!(txn.currency.as_deref(), Some("EUR"));
        assert_eq!(txn.counterparty, None);
        assert_eq!(txn.category, None);
    }

    #[test]
    fn test_bad_dates_become_absent_without_dropping_rows() {
        let table = raw(
            &["Buchungstag", "Betrag"],
            &[&["not-a-date", "1,00"], &["", "2,00"], &["01.02.2024", "3,00"]],
        );
        let statement = normalize(&table).unwrap();
        assert_eq!(statement.transactions.len(), 3);
        assert_eq!(statement.transactions[0].booking_date, None);
        assert_eq!(statement.transactions[1].booking_date, None);
        assert_eq!(statement.transactions[2].booking_date.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_header_only_table_normalizes_to_empty_statement() {
        let table = raw(&["Buchungstag", "Name Zahlungsbeteiligter"], &[]);
        let statement = normalize(&table).unwrap();
        assert_eq!(statement.columns, vec![Column::BookingDate, Column::Counterparty]);
        assert!(statement.transactions.is_empty());
    }
}
