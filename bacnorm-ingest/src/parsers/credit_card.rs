//! BAC Credomatic credit card statement normalizer.
//!
//! Export layout (no header, 9 columns):
//!   05/01/2024,SUPERMERCADO LA COLONIA,1500.00,0.00,004512,...
//!   07/01/2024,NETFLIX.COM,0.00,20.00,118820,...
//!
//! Column 2 is the lempira amount and column 3 the dollar amount. Charges are
//! positive in the export and come out negative.

use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::raw::{open_statement, read_rows};
use crate::schema::{CREDIT_CARD, ProjectedRow};
use crate::table::NormalizedTable;
use crate::types::{Currency, NormalizedRecord, StatementKind};

/// Normalize a credit card statement export.
///
/// Rows without a `DD/MM/YYYY` date in column 0 are dropped.
pub fn normalize_credit_card_statement(path: impl AsRef<Path>) -> Result<NormalizedTable> {
    let file = open_statement(path.as_ref())?;
    normalize_credit_card_statement_from_reader(file)
}

pub fn normalize_credit_card_statement_from_reader<R: Read>(reader: R) -> Result<NormalizedTable> {
    let rows = read_rows(reader, CREDIT_CARD.width)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(projected) = CREDIT_CARD.project(row) else {
            debug!(line = row.line, "dropping credit card row without a valid date");
            continue;
        };
        if let Some(record) = to_record(&projected) {
            records.push(record);
        }
    }

    info!(
        kept = records.len(),
        dropped = rows.len() - records.len(),
        "normalized credit card statement"
    );

    Ok(NormalizedTable::new(StatementKind::CreditCard, records))
}

fn to_record(row: &ProjectedRow) -> Option<NormalizedRecord> {
    let date = row.date("date")?;
    let local = row.amount_or_zero("amount_hnl");
    let foreign = row.amount_or_zero("amount_usd");

    // The currency only looks at the dollar column.
    let currency = if foreign.is_zero() {
        Currency::Hnl
    } else {
        Currency::Usd
    };

    if !local.is_zero() && !foreign.is_zero() {
        warn!(
            line = row.line,
            %local,
            %foreign,
            "row has both lempira and dollar amounts; summing them"
        );
    }

    let Some(total) = local.checked_add(foreign) else {
        warn!(line = row.line, %local, %foreign, "dropping row whose amounts overflow");
        return None;
    };

    Some(NormalizedRecord {
        date,
        reference_number: None,
        description: row.text("description").unwrap_or_default().to_string(),
        currency,
        amount: negate(total),
    })
}

fn negate(amount: Decimal) -> Decimal {
    if amount.is_zero() { Decimal::ZERO } else { -amount }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const STATEMENT: &str = "\
ESTADO DE CUENTA TARJETA,,,,,,,,
Fecha,Descripcion,Lempiras,Dolares,Autorizacion,Comercio,Ciudad,Pais,Tipo
05/01/2024,SUPERMERCADO LA COLONIA,1500.00,0.00,004512,5411,TEGUCIGALPA,HN,C
07/01/2024,NETFLIX.COM,0.00,20.00,118820,4899,LOS GATOS,US,C
,,,,,,,,
12/01/2024,SU PAGO GRACIAS,-3000.00,0.00,,,,,P
Total,,4500.00,20.00,,,,,
";

    fn parse(text: &str) -> NormalizedTable {
        normalize_credit_card_statement_from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_parses_transaction_rows_only() {
        let table = parse(STATEMENT);
        assert_eq!(table.kind, StatementKind::CreditCard);
        assert_eq!(table.len(), 3);
        assert!(table.records.iter().all(|r| r.reference_number.is_none()));
    }

    #[test]
    fn test_lempira_charge() {
        let table = parse(STATEMENT);
        let r = &table.records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(r.description, "SUPERMERCADO LA COLONIA");
        assert_eq!(r.currency, Currency::Hnl);
        assert_eq!(r.amount, dec!(-1500.00));
    }

    #[test]
    fn test_dollar_charge() {
        let table = parse(STATEMENT);
        let r = &table.records[1];
        assert_eq!(r.currency, Currency::Usd);
        assert_eq!(r.amount, dec!(-20.00));
    }

    #[test]
    fn test_payment_is_positive() {
        let table = parse(STATEMENT);
        let r = &table.records[2];
        assert_eq!(r.description, "SU PAGO GRACIAS");
        assert_eq!(r.currency, Currency::Hnl);
        assert_eq!(r.amount, dec!(3000.00));
    }

    #[test]
    fn test_non_numeric_amount_counts_as_zero() {
        let text = "\
08/01/2024,FARMACIA SIMAN,250.00,N/A,,,,,
09/01/2024,AMAZON MKTPLACE,,15.00,,,,,
";
        let table = parse(text);
        assert_eq!(table.len(), 2);

        assert_eq!(table.records[0].currency, Currency::Hnl);
        assert_eq!(table.records[0].amount, dec!(-250.00));

        assert_eq!(table.records[1].currency, Currency::Usd);
        assert_eq!(table.records[1].amount, dec!(-15.00));
    }

    #[test]
    fn test_both_amounts_are_summed() {
        let table = parse("10/01/2024,MIXED,100.00,10.00,,,,,\n");
        assert_eq!(table.records[0].currency, Currency::Usd);
        assert_eq!(table.records[0].amount, dec!(-110.00));
    }

    #[test]
    fn test_overflowing_sum_drops_row() {
        let text = "\
05/01/2024,HUGE,79228162514264337593543950335,79228162514264337593543950335,,,,,
06/01/2024,NORMAL,10.00,0.00,,,,,
";
        let table = parse(text);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].description, "NORMAL");
        assert_eq!(table.records[0].amount, dec!(-10.00));
    }

    #[test]
    fn test_zero_amount_row() {
        let table = parse("11/01/2024,AJUSTE,0.00,0.00,,,,,\n");
        assert_eq!(table.records[0].currency, Currency::Hnl);
        assert!(table.records[0].amount.is_zero());
        assert!(!table.records[0].amount.is_sign_negative());
    }

    #[test]
    fn test_short_row_is_padded() {
        let table = parse("13/01/2024,TIENDA,75.00\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].amount, dec!(-75.00));
    }

    #[test]
    fn test_other_date_formats_are_dropped() {
        let text = "\
2024-01-05,ISO DATE,1.00,0.00,,,,,
05/01/24,SHORT YEAR,1.00,0.00,,,,,
05/01/2024,OK,1.00,0.00,,,,,
";
        let table = parse(text);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].description, "OK");
    }

    #[test]
    fn test_wide_row_fails_the_read() {
        let err = normalize_credit_card_statement_from_reader(
            "05/01/2024,X,1.00,0.00,,,,,,extra\n".as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, NormalizeError::ColumnCount { expected: 9, found: 10, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = normalize_credit_card_statement("/nonexistent/statement.csv").unwrap_err();
        assert!(matches!(err, NormalizeError::Open { .. }));
    }
}
