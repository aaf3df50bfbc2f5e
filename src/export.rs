//! CSV export of list pages.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::resource::Resource;
use crate::domain::{Column, ViewModel};

/// Rows requested from the backend for one export.
pub const EXPORT_PAGE_SIZE: usize = 1000;

/// Lets spreadsheet tools detect UTF-8 (Persian text).
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush CSV output: {0}")]
    Flush(String),
}

/// Columns to export, in table order.
///
/// Unknown keys are ignored; an empty request yields the resource's default
/// export columns.
pub fn select_columns<V: ViewModel>(requested: &[String]) -> Vec<Column> {
    let columns = V::columns();
    let selected: Vec<Column> = columns
        .iter()
        .filter(|column| requested.iter().any(|key| key == column.key))
        .copied()
        .collect();
    if selected.is_empty() {
        columns.iter().filter(|column| column.exported).copied().collect()
    } else {
        selected
    }
}

pub fn to_csv<V: ViewModel>(
    items: &[V],
    columns: &[Column],
    include_header: bool,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    if include_header {
        writer.write_record(columns.iter().map(|column| column.label))?;
    }
    for item in items {
        writer.write_record(columns.iter().map(|column| item.field(column.key).to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.error().to_string()))
}

pub fn file_name(resource: Resource, date: NaiveDate) -> String {
    format!("{}-export-{}.csv", resource.slug(), date.format("%Y-%m-%d"))
}
