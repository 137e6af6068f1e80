//! Spreadsheet and CSV export.
//!
//! The practice log is mirrored to a spreadsheet after every mutation. The
//! file is rewritten in full each time, newest record first, with the
//! columns listed in [`LOG_COLUMNS`]. The format follows the file
//! extension: `.xlsx` writes an Excel workbook, `.csv` a CSV file.
//!
//! Query results and filtered log listings can also be written as CSV.

use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use sql_practice_core::{CellValue, LOG_COLUMNS, PracticeRecord, ResultSet};

use crate::error::{Result, StoreError};

/// Worksheet name used in `.xlsx` exports.
const SHEET_NAME: &str = "practice_log";

/// File format of a log export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            _ => Err(StoreError::ExportError(format!(
                "unsupported export file '{}': expected .xlsx or .csv",
                path.display()
            ))),
        }
    }
}

/// Result of mirroring the log after a mutation.
///
/// A failed export never undoes the mutation that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// No export file is configured.
    Disabled,
    /// The file was rewritten with `rows` records.
    Written { path: PathBuf, rows: usize },
    /// Writing failed; the message describes why.
    Failed(String),
}

impl ExportStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Writes the full practice log to one file.
#[derive(Debug, Clone)]
pub struct LogExporter {
    path: PathBuf,
    format: ExportFormat,
}

impl LogExporter {
    /// Creates an exporter for `path`, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// [`StoreError::ExportError`] for extensions other than `.xlsx`/`.csv`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ExportFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Replaces the export file with `records`, in the given order.
    pub fn write(&self, records: &[PracticeRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StoreError::export)?;
        }
        match self.format {
            ExportFormat::Xlsx => write_records_xlsx(records, &self.path),
            ExportFormat::Csv => {
                let file = std::fs::File::create(&self.path).map_err(StoreError::export)?;
                write_records_csv(records, std::io::BufWriter::new(file))
            }
        }
    }
}

fn write_records_xlsx(records: &[PracticeRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(StoreError::export)?;

    let header = Format::new().set_bold();
    for (col, name) in LOG_COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *name, &header)
            .map_err(StoreError::export)?;
    }
    sheet.set_column_width(2, 40).map_err(StoreError::export)?;
    sheet.set_column_width(3, 60).map_err(StoreError::export)?;
    sheet.set_column_width(7, 20).map_err(StoreError::export)?;

    for (idx, record) in records.iter().enumerate() {
        let row = u32::try_from(idx + 1)
            .map_err(|_| StoreError::ExportError("too many rows for a worksheet".to_string()))?;
        sheet
            .write_number(row, 0, record.id as f64)
            .and_then(|s| s.write_string(row, 1, record.topic.as_str()))
            .and_then(|s| s.write_string(row, 2, record.question_title.as_str()))
            .and_then(|s| s.write_string(row, 3, record.query_text.as_str()))
            .and_then(|s| s.write_string(row, 4, record.note()))
            .and_then(|s| s.write_number(row, 5, record.rows_returned as f64))
            .and_then(|s| s.write_number(row, 6, record.exec_time_ms as f64))
            .and_then(|s| s.write_string(row, 7, record.created_at_display()))
            .map_err(StoreError::export)?;
    }

    workbook.save(path).map_err(StoreError::export)?;
    Ok(())
}

/// Writes practice records as CSV with a header row.
pub fn write_records_csv<W: Write>(records: &[PracticeRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(LOG_COLUMNS).map_err(StoreError::export)?;
    for record in records {
        csv.write_record([
            record.id.to_string(),
            record.topic.clone(),
            record.question_title.clone(),
            record.query_text.clone(),
            record.note().to_string(),
            record.rows_returned.to_string(),
            record.exec_time_ms.to_string(),
            record.created_at_display(),
        ])
        .map_err(StoreError::export)?;
    }
    csv.flush().map_err(StoreError::export)?;
    Ok(())
}

/// Writes a query result as CSV with a header row. `NULL` becomes an empty
/// field.
pub fn write_result_csv<W: Write>(result: &ResultSet, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&result.columns).map_err(StoreError::export)?;
    for row in &result.rows {
        csv.write_record(row.iter().map(|cell| match cell {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }))
        .map_err(StoreError::export)?;
    }
    csv.flush().map_err(StoreError::export)?;
    Ok(())
}
