//! BAC Credomatic account (checking/savings) statement normalizer.
//!
//! Export layout (no header, 17 columns). The second row is the account
//! header and carries the statement currency in column 3:
//!   Cuenta,Nombre,Producto,Moneda,...
//!   730123456,JUAN PEREZ,AHORRO, LPS ,...
//!   02/02/2024,000123,DB,PAGO ENEE,500.00,0.00,9500.00,...

use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{NormalizeError, Result};
use crate::raw::{RawRow, open_statement, read_rows};
use crate::schema::{BANK_ACCOUNT, ProjectedRow};
use crate::table::NormalizedTable;
use crate::types::{Currency, NormalizedRecord, StatementKind};

/// (row, column) of the statement currency code.
pub const CURRENCY_CELL: (usize, usize) = (1, 3);

/// Normalize an account statement export.
///
/// Fails with [`NormalizeError::UnsupportedCurrency`] before any row is
/// processed when the statement currency is neither `USD` nor `LPS`.
pub fn normalize_account_statement(path: impl AsRef<Path>) -> Result<NormalizedTable> {
    let file = open_statement(path.as_ref())?;
    normalize_account_statement_from_reader(file)
}

pub fn normalize_account_statement_from_reader<R: Read>(reader: R) -> Result<NormalizedTable> {
    let rows = read_rows(reader, BANK_ACCOUNT.width)?;
    let currency = statement_currency(&rows)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(projected) = BANK_ACCOUNT.project(row) else {
            debug!(line = row.line, "dropping account row without a valid date");
            continue;
        };
        if let Some(record) = to_record(&projected, currency) {
            records.push(record);
        }
    }

    info!(
        %currency,
        kept = records.len(),
        dropped = rows.len() - records.len(),
        "normalized account statement"
    );

    Ok(NormalizedTable::new(StatementKind::BankAccount, records))
}

/// Extract and validate the statement-level currency.
pub fn statement_currency(rows: &[RawRow]) -> Result<Currency> {
    let (row, column) = CURRENCY_CELL;
    let code = rows
        .get(row)
        .map(|r| r.cell(column).trim())
        .filter(|code| !code.is_empty())
        .ok_or(NormalizeError::MissingCurrency)?;

    Currency::from_statement_code(code)
}

fn to_record(row: &ProjectedRow, currency: Currency) -> Option<NormalizedRecord> {
    let date = row.date("date")?;
    let debit = row.amount_or_zero("debit");
    let credit = row.amount_or_zero("credit");

    let Some(amount) = credit.checked_sub(debit) else {
        warn!(line = row.line, %debit, %credit, "dropping row whose amounts overflow");
        return None;
    };

    Some(NormalizedRecord {
        date,
        reference_number: row.text("reference_number").map(str::to_string),
        description: row.text("description").unwrap_or_default().to_string(),
        currency,
        amount,
    })
}
