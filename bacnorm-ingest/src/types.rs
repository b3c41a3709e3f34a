use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NormalizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    CreditCard,
    BankAccount,
}

impl StatementKind {
    /// Output columns for this kind, in order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            StatementKind::CreditCard => &["date", "description", "currency", "amount"],
            StatementKind::BankAccount => &[
                "date",
                "reference_number",
                "description",
                "currency",
                "amount",
            ],
        }
    }
}

impl FromStr for StatementKind {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit-card" | "credit_card" | "cc" => Ok(StatementKind::CreditCard),
            "account" | "bank-account" | "bank_account" => Ok(StatementKind::BankAccount),
            other => Err(NormalizeError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::CreditCard => f.write_str("credit-card"),
            StatementKind::BankAccount => f.write_str("account"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Honduran lempira
    Hnl,
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Hnl => "HNL",
            Currency::Usd => "USD",
        }
    }

    /// Map the code printed in an account statement header.
    ///
    /// BAC prints lempiras as `LPS`.
    pub fn from_statement_code(code: &str) -> Result<Self, NormalizeError> {
        match code {
            "USD" => Ok(Currency::Usd),
            "LPS" => Ok(Currency::Hnl),
            other => Err(NormalizeError::UnsupportedCurrency(other.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized output of statement parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub date: NaiveDate,
    /// Only account statements carry one.
    pub reference_number: Option<String>,
    pub description: String,
    pub currency: Currency,
    /// Negative means expense/debit; positive means income/credit.
    pub amount: Decimal,
}
