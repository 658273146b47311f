use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;

/// Output format of exported frequency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct FrequencyRow<'a> {
    item: &'a str,
    count: i64,
    rank: i64,
}

///Neutralizes cells a spreadsheet would read as a formula by prefixing `'`.
/// # Example
/// ```
/// use word_stat::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("plain".to_string()), "plain");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// Local time stamp used in export file names, e.g. `20240131_235959`.
pub fn timestamp() -> String {
    let local: DateTime<Local> = Local::now();
    local.format("%Y%m%d_%H%M%S").to_string()
}

/// Writes `rows` (item, count, rank) to `<out_dir>/<stem>_<stamp>_<table>.<ext>`.
pub fn export_table(
    out_dir: &Path,
    stem: &str,
    stamp: &str,
    table: &str,
    rows: &[(&str, i64, i64)],
    format: ExportFormat,
) -> Result<PathBuf, String> {
    let path = out_dir.join(format!(
        "{stem}_{stamp}_{table}.{}",
        format.extension()
    ));
    let file = File::create(&path).map_err(|e| format!("Create {} failed: {e}", path.display()))?;
    let rows: Vec<FrequencyRow> = rows
        .iter()
        .map(|&(item, count, rank)| FrequencyRow { item, count, rank })
        .collect();

    let written = match format {
        ExportFormat::Txt => write_txt(file, &rows),
        ExportFormat::Csv => write_delimited(file, &rows, b','),
        ExportFormat::Tsv => write_delimited(file, &rows, b'\t'),
        ExportFormat::Json => write_json(file, &rows),
    };
    written.map_err(|e| format!("Write {} failed: {e}", path.display()))?;

    Ok(path)
}

fn write_txt(file: File, rows: &[FrequencyRow]) -> Result<(), String> {
    let mut out = BufWriter::new(file);
    for row in rows {
        writeln!(out, "{}\t{}\t{}", row.item, row.count, row.rank).map_err(|e| e.to_string())?;
    }
    out.flush().map_err(|e| e.to_string())
}

fn write_delimited(file: File, rows: &[FrequencyRow], delimiter: u8) -> Result<(), String> {
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(file);
    wtr.write_record(["item", "count", "rank"])
        .map_err(|e| e.to_string())?;
    for row in rows {
        wtr.write_record([
            csv_safe_cell(row.item.to_string()),
            row.count.to_string(),
            row.rank.to_string(),
        ])
        .map_err(|e| e.to_string())?;
    }
    wtr.flush().map_err(|e| e.to_string())
}

fn write_json(file: File, rows: &[FrequencyRow]) -> Result<(), String> {
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, rows).map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())
}
