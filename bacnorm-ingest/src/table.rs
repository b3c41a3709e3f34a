//! The normalized table and its CSV/JSON renderings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::types::{Currency, NormalizedRecord, StatementKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub kind: StatementKind,
    pub records: Vec<NormalizedRecord>,
}

#[derive(Serialize)]
struct CreditCardRow<'a> {
    date: NaiveDate,
    description: &'a str,
    currency: Currency,
    amount: Decimal,
}

#[derive(Serialize)]
struct AccountRow<'a> {
    date: NaiveDate,
    reference_number: Option<&'a str>,
    description: &'a str,
    currency: Currency,
    amount: Decimal,
}

impl<'a> From<&'a NormalizedRecord> for CreditCardRow<'a> {
    fn from(r: &'a NormalizedRecord) -> Self {
        Self {
            date: r.date,
            description: &r.description,
            currency: r.currency,
            amount: r.amount,
        }
    }
}

impl<'a> From<&'a NormalizedRecord> for AccountRow<'a> {
    fn from(r: &'a NormalizedRecord) -> Self {
        Self {
            date: r.date,
            reference_number: r.reference_number.as_deref(),
            description: &r.description,
            currency: r.currency,
            amount: r.amount,
        }
    }
}

impl NormalizedTable {
    pub fn new(kind: StatementKind, records: Vec<NormalizedRecord>) -> Self {
        Self { kind, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.kind.columns()
    }

    /// Sum of amounts per currency.
    pub fn totals(&self) -> BTreeMap<Currency, Decimal> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            *totals.entry(r.currency).or_insert(Decimal::ZERO) += r.amount;
        }
        totals
    }

    /// Write the table with a header row, using this kind's columns.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        if self.records.is_empty() {
            // serialize() only emits the header alongside the first row
            wtr.write_record(self.columns())?;
        }
        match self.kind {
            StatementKind::CreditCard => {
                for r in &self.records {
                    wtr.serialize(CreditCardRow::from(r))?;
                }
            }
            StatementKind::BankAccount => {
                for r in &self.records {
                    wtr.serialize(AccountRow::from(r))?;
                }
            }
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the table as a JSON array of objects.
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> serde_json::Result<()> {
        match self.kind {
            StatementKind::CreditCard => {
                let rows: Vec<CreditCardRow> = self.records.iter().map(Into::into).collect();
                write_json_rows(writer, &rows, pretty)
            }
            StatementKind::BankAccount => {
                let rows: Vec<AccountRow> = self.records.iter().map(Into::into).collect();
                write_json_rows(writer, &rows, pretty)
            }
        }
    }
}

fn write_json_rows<W: Write, T: Serialize>(writer: W, rows: &[T], pretty: bool) -> serde_json::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, rows)
    } else {
        serde_json::to_writer(writer, rows)
    }
}
