use std::io::{Read, Write};
use std::path::Path;

use crate::error::{BanksortError, Result};
use crate::models::{RawTable, Statement, CATEGORY_HEADER};

pub const DELIMITER: u8 = b';';

fn semicolon_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

/// Read a semicolon-delimited UTF-8 table with a header row.
///
/// Short rows are padded with absent cells; a row with more fields than the
/// header is rejected, as is any field that is not valid UTF-8.
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = semicolon_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > width {
            return Err(BanksortError::MalformedRow {
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
            .collect();
        row.resize(width, None);
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

pub fn read_raw_file(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    read_raw_table(std::io::BufReader::new(file))
}

/// Write a statement with its kept columns plus the category column.
/// Absent values are written as empty fields.
pub fn write_statement<W: Write>(writer: W, statement: &Statement) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);

    let mut header: Vec<&str> = statement.columns.iter().map(|c| c.header()).collect();
    header.push(CATEGORY_HEADER);
    wtr.write_record(&header)?;

    for txn in &statement.transactions {
        let mut record: Vec<&str> = statement
            .columns
            .iter()
            .map(|c| txn.field(*c).unwrap_or(""))
            .collect();
        record.push(txn.category.as_deref().unwrap_or(""));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a statement next to `path` and rename it into place, so an existing
/// file is only replaced once the new one is complete.
pub fn write_statement_file(path: &Path, statement: &Statement) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_statement(std::io::BufWriter::new(&mut tmp), statement)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
