//! bacnorm-ingest: normalizers for BAC Credomatic CSV statement exports.
//!
//! Both formats are positional CSV without a header row. Output records use
//! one sign convention: expenses negative, income and credits positive.

pub mod error;
pub mod parsers;
pub mod raw;
pub mod schema;
pub mod table;
pub mod types;

pub use error::{NormalizeError, Result};
pub use parsers::account::{normalize_account_statement, normalize_account_statement_from_reader};
pub use parsers::credit_card::{
    normalize_credit_card_statement, normalize_credit_card_statement_from_reader,
};
pub use table::NormalizedTable;
pub use types::{Currency, NormalizedRecord, StatementKind};

use std::io::Read;
use std::path::Path;

/// Normalize `path` with the normalizer for `kind`.
pub fn normalize(kind: StatementKind, path: impl AsRef<Path>) -> Result<NormalizedTable> {
    match kind {
        StatementKind::CreditCard => normalize_credit_card_statement(path),
        StatementKind::BankAccount => normalize_account_statement(path),
    }
}

pub fn normalize_from_reader<R: Read>(kind: StatementKind, reader: R) -> Result<NormalizedTable> {
    match kind {
        StatementKind::CreditCard => normalize_credit_card_statement_from_reader(reader),
        StatementKind::BankAccount => normalize_account_statement_from_reader(reader),
    }
}
