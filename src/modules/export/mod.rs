//! Export Module
//!
//! Renders command output as padded text tables, JSON or CSV.
//!
//! - Constants tables → any `OutputFormat`
//! - Tool results (label/value pairs) → aligned text

mod csv_export;
mod json_export;
mod table;

use std::io::Write;

pub use table::Table;

/// Output format for tabular commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Write tables in the requested format
pub fn write_tables(
    out: &mut impl Write,
    tables: &[Table],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            for (idx, table) in tables.iter().enumerate() {
                if idx > 0 {
                    writeln!(out)?;
                }
                table.write_to(out)?;
            }
        }
        OutputFormat::Json => json_export::write_tables(out, tables)?,
        OutputFormat::Csv => csv_export::write_tables(out, tables)?,
    }
    out.flush()?;
    Ok(())
}

/// Result of a single tool invocation
pub struct ToolResult {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
}

impl ToolResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    /// Title line, blank line, then labels padded to a common width
    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{}", self.title)?;
        writeln!(out)?;
        let width = self.content.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (label, value) in &self.content {
            writeln!(out, "{label:<width$}  {value}")?;
        }
        Ok(())
    }
}
