//! Workbook encoding.

use std::collections::HashMap;

use csv::WriterBuilder;

use super::{ColumnSpec, SheetError, SheetResult, EMPTY_CELL};

/// An in-memory workbook: an ordered column layout plus data rows.
///
/// Records are keyed by [`ColumnSpec::key`]; missing or empty fields render
/// as the `-` placeholder.
#[derive(Debug, Clone)]
pub struct Sheet {
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(columns: &[ColumnSpec]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append one record, mapped through the column layout.
    pub fn push_record(&mut self, record: &HashMap<String, String>) {
        let row = self
            .columns
            .iter()
            .map(|col| match record.get(col.key) {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => EMPTY_CELL.to_string(),
            })
            .collect();
        self.rows.push(row);
    }

    /// Serialize to workbook bytes: one header row of display labels, then
    /// one row per record.
    pub fn to_csv(&self) -> SheetResult<String> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        writer.write_record(self.columns.iter().map(|c| c.header))?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let buf = writer
            .into_inner()
            .map_err(|e| SheetError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Render an aligned text preview of the first `limit` rows.
    ///
    /// Column widths auto-expand to the longest rendered cell, floored at the
    /// layout's configured minimum width.
    pub fn preview(&self, limit: usize) -> String {
        let shown = &self.rows[..self.rows.len().min(limit)];

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let longest_cell = shown
                    .iter()
                    .map(|row| row[idx].chars().count())
                    .max()
                    .unwrap_or(0);
                col.width.max(col.header.chars().count()).max(longest_cell)
            })
            .collect();

        let mut out = String::new();
        render_line(
            &mut out,
            &widths,
            self.columns.iter().map(|c| c.header.to_string()).collect(),
        );
        for row in shown {
            render_line(&mut out, &widths, row.clone());
        }
        if self.rows.len() > limit {
            out.push_str(&format!("... {} more row(s)\n", self.rows.len() - limit));
        }
        out
    }
}

fn render_line(out: &mut String, widths: &[usize], cells: Vec<String>) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
