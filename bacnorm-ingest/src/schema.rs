//! Per-format column schemas and the row projection they share.
//!
//! A schema is an ordered list of `(position, name, kind, required)` column
//! specs. [`FormatSchema::project`] coerces a raw row against it; a row whose
//! required cell fails to coerce is rejected as a whole.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::raw::RawRow;
use crate::types::StatementKind;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Text,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub position: usize,
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

impl ColumnSpec {
    pub const fn new(position: usize, name: &'static str, kind: ColumnKind, required: bool) -> Self {
        Self {
            position,
            name,
            kind,
            required,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormatSchema {
    pub kind: StatementKind,
    /// Number of columns in the export; only `columns` are read.
    pub width: usize,
    pub columns: &'static [ColumnSpec],
}

/// Credit card export: date, description, HNL amount, USD amount, then
/// authorization metadata in columns 4-8.
pub const CREDIT_CARD: FormatSchema = FormatSchema {
    kind: StatementKind::CreditCard,
    width: 9,
    columns: &[
        ColumnSpec::new(0, "date", ColumnKind::Date, true),
        ColumnSpec::new(1, "description", ColumnKind::Text, false),
        ColumnSpec::new(2, "amount_hnl", ColumnKind::Amount, false),
        ColumnSpec::new(3, "amount_usd", ColumnKind::Amount, false),
    ],
};

/// Account export: date, reference, transaction code, description, debit,
/// credit; columns 6-16 are balances and branch data.
pub const BANK_ACCOUNT: FormatSchema = FormatSchema {
    kind: StatementKind::BankAccount,
    width: 17,
    columns: &[
        ColumnSpec::new(0, "date", ColumnKind::Date, true),
        ColumnSpec::new(1, "reference_number", ColumnKind::Text, false),
        ColumnSpec::new(2, "transaction_code", ColumnKind::Text, false),
        ColumnSpec::new(3, "description", ColumnKind::Text, false),
        ColumnSpec::new(4, "debit", ColumnKind::Amount, false),
        ColumnSpec::new(5, "credit", ColumnKind::Amount, false),
    ],
};

impl FormatSchema {
    pub fn for_kind(kind: StatementKind) -> &'static FormatSchema {
        match kind {
            StatementKind::CreditCard => &CREDIT_CARD,
            StatementKind::BankAccount => &BANK_ACCOUNT,
        }
    }

    /// Coerce `row` against this schema. `None` when a required cell is null.
    pub fn project(&self, row: &RawRow) -> Option<ProjectedRow> {
        let mut cells = Vec::with_capacity(self.columns.len());

        for spec in self.columns {
            let raw = row.cell(spec.position);
            let cell = match spec.kind {
                ColumnKind::Date => Cell::Date(parse_statement_date(raw)),
                ColumnKind::Text => Cell::Text(Some(raw.to_string()).filter(|s| !s.is_empty())),
                ColumnKind::Amount => Cell::Amount(parse_amount(raw)),
            };
            if spec.required && cell.is_null() {
                return None;
            }
            cells.push((spec.name, cell));
        }

        Some(ProjectedRow {
            line: row.line,
            cells,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Date(Option<NaiveDate>),
    Text(Option<String>),
    Amount(Option<Decimal>),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Date(d) => d.is_none(),
            Cell::Text(t) => t.is_none(),
            Cell::Amount(a) => a.is_none(),
        }
    }
}

/// A row after projection, addressed by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRow {
    pub line: u64,
    cells: Vec<(&'static str, Cell)>,
}

impl ProjectedRow {
    fn get(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|(n, _)| *n == name).map(|(_, c)| c)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.get(name) {
            Some(Cell::Date(d)) => *d,
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Cell::Text(t)) => t.as_deref(),
            _ => None,
        }
    }

    pub fn amount(&self, name: &str) -> Option<Decimal> {
        match self.get(name) {
            Some(Cell::Amount(a)) => *a,
            _ => None,
        }
    }

    /// Non-numeric amounts count as zero.
    pub fn amount_or_zero(&self, name: &str) -> Decimal {
        self.amount(name).unwrap_or(Decimal::ZERO)
    }
}

/// Parse a `DD/MM/YYYY` date. The year must have exactly four digits.
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let (_, year) = raw.rsplit_once('/')?;
    if year.len() != 4 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Coerce a numeric cell. Empty or non-numeric text is `None`, and so is a
/// number too large for `Decimal`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let parsed = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok();

    if parsed.is_none() && s.parse::<f64>().is_ok_and(f64::is_finite) {
        warn!(amount = s, "amount out of decimal range; treating as non-numeric");
    }
    parsed
}
