//! CSV Export
//!
//! Writes tables as CSV records. Each table contributes a header record and its rows,
//! all prefixed with the table title so mixed tables stay distinguishable.

use std::io::Write;

/// Write tables to CSV
pub fn write_tables(out: &mut impl Write, tables: &[super::Table]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);

    for table in tables {
        // Write header
        let mut header = vec!["table"];
        header.extend(table.headers.iter().map(String::as_str));
        wtr.write_record(&header)?;

        // Write data rows
        for row in &table.rows {
            let mut record = vec![table.title.as_str()];
            record.extend(row.iter().map(String::as_str));
            wtr.write_record(&record)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
