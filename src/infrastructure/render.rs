use std::io::Write;

use anyhow::{Context, Result};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::domain::output_format::OutputFormat;
use crate::domain::process::ProcessEntry;

/// Report header row: the source connection label plus the eight process
/// fields, in the same order the SELECT produces them.
pub const REPORT_HEADERS: [&str; 9] = [
    "Connection",
    "Id",
    "User",
    "Host",
    "Db",
    "Command",
    "Time",
    "State",
    "Info",
];

pub fn render_report(
    sink: &mut dyn Write,
    format: OutputFormat,
    entries: &[ProcessEntry],
) -> Result<()> {
    let rows = entries.iter().map(entry_cells).collect::<Vec<_>>();
    match format {
        OutputFormat::Grid => render_grid(sink, &rows),
        OutputFormat::Csv => render_delimited(sink, &rows, b','),
        OutputFormat::Tab => render_delimited(sink, &rows, b'\t'),
        OutputFormat::Vertical => render_vertical(sink, &rows),
    }
}

fn entry_cells(entry: &ProcessEntry) -> Vec<String> {
    let mut cells = Vec::with_capacity(REPORT_HEADERS.len());
    cells.push(entry.connection.clone());
    cells.extend(entry.row.cells());
    cells
}

fn render_grid(sink: &mut dyn Write, rows: &[Vec<String>]) -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(REPORT_HEADERS);
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    let mut table = builder.build();
    table.with(Style::ascii());
    writeln!(sink, "{table}").context("Unable to write the process report")?;
    Ok(())
}

fn render_delimited(sink: &mut dyn Write, rows: &[Vec<String>], delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(sink);
    writer
        .write_record(REPORT_HEADERS)
        .context("Unable to write the report header")?;
    for row in rows {
        writer
            .write_record(row)
            .context("Unable to write a report row")?;
    }
    writer.flush().context("Unable to flush the process report")?;
    Ok(())
}

fn render_vertical(sink: &mut dyn Write, rows: &[Vec<String>]) -> Result<()> {
    let width = REPORT_HEADERS
        .iter()
        .map(|header| header.len())
        .max()
        .unwrap_or(0);
    for (index, row) in rows.iter().enumerate() {
        writeln!(
            sink,
            "{stars} {}. row {stars}",
            index + 1,
            stars = "*".repeat(25),
        )?;
        for (header, value) in REPORT_HEADERS.iter().zip(row) {
            writeln!(sink, "{header:>width$}: {value}")?;
        }
    }
    Ok(())
}
