//! Tabular task sheet (CSV) adapter.
//!
//! The sheet is edited by hand, so it is treated as the source of truth for
//! every non-derived cell: rows keep their original text and only the derived
//! columns are rewritten. Header order and unknown columns survive a save.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{info, warn};

use burner_core::metrics;
use burner_core::task::{columns, TaskRecord};

use crate::error::StoreError;

/// One sheet row keyed by column header.
pub type Row = IndexMap<String, String>;

#[derive(Debug, Clone)]
pub struct TaskSheet {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl TaskSheet {
    /// Read the sheet at `path`. A file without a header row is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = std::fs::File::open(&path)?;
        let sheet = Self::from_reader(file, path)?;
        info!("Loaded {} tasks from {}", sheet.rows.len(), sheet.path.display());
        Ok(sheet)
    }

    pub fn from_reader<R: Read>(reader: R, path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(StoreError::MissingHeader(path));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > headers.len() {
                warn!(
                    "{}: row {} has {} cells for {} columns, dropping the overflow",
                    path.display(),
                    line + 1,
                    record.len(),
                    headers.len()
                );
            }
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            rows.push(row);
        }

        Ok(Self { path, headers, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Typed view of every row, in sheet order.
    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.rows.iter().map(TaskRecord::from_row).collect()
    }

    /// Write the derived fields of `tasks` back into the matching rows.
    ///
    /// `tasks` must come from [`TaskSheet::tasks`] on this sheet; rows are
    /// matched by position. Derived columns missing from the header are
    /// appended to it.
    pub fn apply(&mut self, tasks: &[TaskRecord]) {
        for column in columns::DERIVED {
            if !self.headers.iter().any(|h| h == column) {
                self.headers.push(column.to_string());
            }
        }
        for (row, task) in self.rows.iter_mut().zip(tasks) {
            for (column, value) in task.derived_cells() {
                row.insert(column.to_string(), value);
            }
        }
    }

    /// Recalculate every row as of `today`. Returns the number of rows touched.
    pub fn recalculate(&mut self, today: NaiveDate) -> usize {
        let mut tasks = self.tasks();
        let count = metrics::recalculate_all(&mut tasks, today);
        self.apply(&tasks);
        count
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(
                self.headers
                    .iter()
                    .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Overwrite the file the sheet was loaded from.
    pub fn save(&self) -> Result<(), StoreError> {
        let file = std::fs::File::create(&self.path)?;
        self.write_to(file)?;
        info!("Saved {} tasks to {}", self.rows.len(), self.path.display());
        Ok(())
    }
}
