use anyhow::{Context, Result};
use bacnorm_ingest::NormalizedTable;
use std::io::Write;
use std::path::Path;

use crate::config::OutputFormat;

pub fn write_table<W: Write>(
    table: &NormalizedTable,
    format: OutputFormat,
    pretty: bool,
    mut writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => table.write_csv(&mut writer).context("write csv")?,
        OutputFormat::Json => {
            table.write_json(&mut writer, pretty).context("write json")?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn render_summary(table: &NormalizedTable, source: &Path) -> String {
    let mut s = format!(
        "Parsed {} {} transactions from {}\n",
        table.len(),
        table.kind,
        source.display()
    );
    for (currency, total) in table.totals() {
        s.push_str(&format!("  {}: {}\n", currency, total));
    }
    s
}
