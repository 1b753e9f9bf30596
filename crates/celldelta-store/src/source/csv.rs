//! OpenCellID CSV reader
//!
//! Reads the 14-column OpenCellID export
//! (`radio,mcc,net,area,cell,unit,lon,lat,range,samples,changeable,created,updated,averageSignal`).
//! Exports carry no quoting, so lines are split on commas. A first line
//! starting with `radio,` is a header and is skipped. Blank lines are kept
//! as empty rows so the normalizer can count them.

use crate::errors::{source_unreadable, Result};
use celldelta_core::model::{RawRow, RawSource};
use std::path::{Path, PathBuf};

/// CSV file raw source
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Point at a CSV file
    ///
    /// # Errors
    ///
    /// `SourceUnreadable` if the path is not a readable regular file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let descriptor = descriptor_for(&path);
        let metadata =
            std::fs::metadata(&path).map_err(|e| source_unreadable(&descriptor, e.to_string()))?;
        if !metadata.is_file() {
            return Err(source_unreadable(&descriptor, "not a regular file"));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawSource for CsvFileSource {
    fn provenance(&self) -> String {
        descriptor_for(&self.path)
    }

    fn read_rows(&self) -> Result<Vec<RawRow>> {
        let descriptor = self.provenance();
        let bytes =
            std::fs::read(&self.path).map_err(|e| source_unreadable(&descriptor, e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| source_unreadable(&descriptor, format!("invalid UTF-8: {}", e)))?;

        let rows = parse_rows(&text);
        tracing::debug!(provenance = %descriptor, rows = rows.len(), "CSV source read");
        Ok(rows)
    }
}

/// Split CSV text into raw rows, skipping a header line
pub fn parse_rows(text: &str) -> Vec<RawRow> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().peekable();

    if lines
        .peek()
        .is_some_and(|first| first.trim_start().to_ascii_lowercase().starts_with("radio,"))
    {
        lines.next();
    }

    lines
        .enumerate()
        .map(|(index, line)| {
            if line.trim().is_empty() {
                RawRow::new(index)
            } else {
                let fields: Vec<&str> = line.split(',').collect();
                RawRow::from_fields(index, &fields)
            }
        })
        .collect()
}

fn descriptor_for(path: &Path) -> String {
    format!("file:{}", path.display())
}
