//! Positional CSV rows, read without a header.

use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{NormalizeError, Result};

/// One CSV record padded to the format width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn cell(&self, position: usize) -> &str {
        self.cells.get(position).map(String::as_str).unwrap_or("")
    }
}

pub(crate) fn open_statement(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| NormalizeError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every record, padding short rows with empty cells.
///
/// Rows wider than `width` are a structural mismatch and fail the read.
pub fn read_rows<R: Read>(reader: R, width: usize) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() > width {
            return Err(NormalizeError::ColumnCount {
                line,
                expected: width,
                found: record.len(),
            });
        }

        let mut cells: Vec<String> = record.iter().map(decode_cell).collect();
        if rows.is_empty() {
            if let Some(first) = cells.first_mut() {
                if first.starts_with('\u{feff}') {
                    first.remove(0);
                }
            }
        }
        cells.resize(width, String::new());

        rows.push(RawRow { line, cells });
    }

    Ok(rows)
}

/// UTF-8 when valid, Windows-1252 otherwise (BAC exports accented text in it).
fn decode_cell(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let (decoded, _, _) = WINDOWS_1252.decode(bytes);
    decoded.into_owned()
}
