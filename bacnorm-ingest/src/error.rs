use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the normalizers.
///
/// Row-level noise (headers, footers, blank lines, non-numeric amounts) is
/// never reported here; those rows are filtered or coerced instead.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("opening {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected at most {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The statement-level currency cell is absent or blank.
    #[error("account statement has no currency cell")]
    MissingCurrency,

    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),

    #[error("unknown statement kind: {0} (expected credit-card or account)")]
    UnknownKind(String),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
