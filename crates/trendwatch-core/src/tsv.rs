//! Tab-separated artifact writing and reading.
//!
//! Every exported field passes through [`sanitize_field`] so the
//! one-record-per-line invariant holds; a row is written only fully formed.
//! Existing files with the same name are overwritten, never appended.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::records::{PostRecord, RegionalInterestRecord, TrendRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is empty or has no header row")]
    MissingHeader { path: String },
}

/// Replaces embedded tab, newline, and carriage-return characters with
/// single spaces.
#[must_use]
pub fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

/// A record type that can be serialized as one TSV row.
pub trait TsvRecord {
    fn header() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl TsvRecord for TrendRecord {
    fn header() -> &'static [&'static str] {
        &["label", "count", "source"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            self.count.to_string(),
            self.source.to_string(),
        ]
    }
}

impl TsvRecord for PostRecord {
    fn header() -> &'static [&'static str] {
        &["id", "text", "likes", "comments", "created_at"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.text.clone(),
            self.like_count.to_string(),
            self.comment_count.to_string(),
            self.created_at.to_rfc3339(),
        ]
    }
}

impl TsvRecord for RegionalInterestRecord {
    fn header() -> &'static [&'static str] {
        &["state", "product", "score"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.state.clone(),
            self.product.clone(),
            self.score.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }
}

/// Writes `records` to `path` as TSV with a header row, overwriting any
/// existing file.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be created or written.
pub fn write_records<T: TsvRecord>(path: &Path, records: &[T]) -> Result<(), ExportError> {
    let mut lines = String::new();
    let _ = writeln!(lines, "{}", T::header().join("\t"));
    for record in records {
        let fields: Vec<String> = record.row().iter().map(|f| sanitize_field(f)).collect();
        let _ = writeln!(lines, "{}", fields.join("\t"));
    }
    write_atomic(path, &lines)
}

/// A generic tabular artifact read back from disk (used by the tagger's
/// annotation pass).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a named column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Reads a TSV artifact (header + rows) from `path`.
///
/// # Errors
///
/// Returns [`ExportError::Io`] on read failure and
/// [`ExportError::MissingHeader`] for an empty file.
pub fn read_table(path: &Path) -> Result<Table, ExportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut lines = content.lines();
    let header: Vec<String> = lines
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ExportError::MissingHeader {
            path: path.display().to_string(),
        })?
        .split('\t')
        .map(str::to_owned)
        .collect();

    let rows = lines
        .filter(|l| !l.is_empty())
        .map(|l| l.split('\t').map(str::to_owned).collect())
        .collect();

    Ok(Table { header, rows })
}

/// Writes a generic table to `path`, sanitizing every cell.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be created or written.
pub fn write_table(path: &Path, table: &Table) -> Result<(), ExportError> {
    let mut lines = String::new();
    let _ = writeln!(lines, "{}", table.header.join("\t"));
    for row in &table.rows {
        let fields: Vec<String> = row.iter().map(|f| sanitize_field(f)).collect();
        let _ = writeln!(lines, "{}", fields.join("\t"));
    }
    write_atomic(path, &lines)
}

// The whole artifact is built in memory and written in one call, so a
// crashed run never leaves a half-written row behind.
fn write_atomic(path: &Path, content: &str) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)
}
