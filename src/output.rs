use crate::error::ReportError;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Write the report payload as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), ReportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render up to `max_rows` rows as a markdown table for the console.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}
