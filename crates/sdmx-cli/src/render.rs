//! Terminal tables and CSV files from result frames.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, CsvWriter, DataFrame, DataType, SerWriter};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Renders a cell value; nulls become empty strings.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => {
            let s = other.to_string();
            if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Builds a styled table of the first `limit` rows of a frame.
///
/// Numeric and date columns are right-aligned.
pub fn frame_table(df: &DataFrame, limit: usize) -> Result<Table> {
    let mut table = Table::new();
    let columns = df.get_columns();
    table.set_header(
        columns
            .iter()
            .map(|column| header_cell(column.name().as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);

    for row in 0..df.height().min(limit) {
        let mut cells = Vec::with_capacity(columns.len());
        for column in columns {
            let value = column
                .get(row)
                .with_context(|| format!("read row {row} of column {}", column.name()))?;
            cells.push(Cell::new(any_to_string(value)));
        }
        table.add_row(cells);
    }

    for (index, column) in columns.iter().enumerate() {
        if matches!(
            column.dtype(),
            DataType::Int32
                | DataType::Int64
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float64
                | DataType::Date
        ) {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    Ok(table)
}

/// Line printed under a truncated table.
pub fn truncation_note(shown: usize, total: usize) -> Option<String> {
    (total > shown).then(|| format!("... {} more rows (use --output to save all)", total - shown))
}

/// Writes a frame as comma-separated values with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(12)), "12");
        assert_eq!(any_to_string(AnyValue::String("EXR")), "EXR");
    }

    #[test]
    fn test_truncation_note() {
        assert_eq!(truncation_note(20, 20), None);
        assert_eq!(
            truncation_note(20, 25).as_deref(),
            Some("... 5 more rows (use --output to save all)")
        );
    }
}
