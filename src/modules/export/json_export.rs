//! JSON Export
//!
//! Writes tables as a JSON array of `{ "title", "rows" }` objects; each row is an
//! object keyed by column header, in column order.

use std::io::Write;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::Table;

#[derive(Serialize)]
struct ExportableTable<'a> {
    title: &'a str,
    rows: ExportableRows<'a>,
}

struct ExportableRows<'a>(&'a Table);

struct ExportableRow<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl Serialize for ExportableRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for cells in &self.0.rows {
            seq.serialize_element(&ExportableRow {
                headers: &self.0.headers,
                cells,
            })?;
        }
        seq.end()
    }
}

impl Serialize for ExportableRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

/// Write tables as pretty JSON
pub fn write_tables(out: &mut impl Write, tables: &[Table]) -> anyhow::Result<()> {
    let exportable: Vec<ExportableTable<'_>> = tables
        .iter()
        .map(|table| ExportableTable {
            title: &table.title,
            rows: ExportableRows(table),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &exportable)?;
    writeln!(out)?;
    Ok(())
}
