#![forbid(unsafe_code)]
//! # word_stat CLI
//!
//! Command-line front end for the `word_stat` crate: counts words and word
//! pairs in `.txt` files, prints a summary and exports the frequency tables.
//!
//! ## Example
//! ```bash
//! cargo run --release -- path/to/texts --top 10 --colloc sir --export-format csv
//! ```
//!
//! Set `RUST_LOG=debug` to see table construction details.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;
use word_stat::{AnalysisOptions, ExportFormat, analyze_path, print_failed_files};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// File or directory to analyze
    path: PathBuf,

    /// Number of entries per summary section
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,

    /// Directory the exported tables are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// If set, analyze all files together and output combined results
    #[arg(long, default_value_t = false)]
    combine: bool,

    /// Also list the most common collocations of this word
    #[arg(long)]
    colloc: Option<String>,

    /// Collocation direction: 1 = following words, -1 = preceding words
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    direction: i32,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let opts = AnalysisOptions {
        top: cli.top,
        export_format: cli.export_format,
        combine: cli.combine,
        colloc: cli.colloc,
        direction: cli.direction,
    };

    match analyze_path(&cli.path, &cli.out_dir, &opts) {
        Ok(report) => {
            print!("{}", report.summary);
            if !report.failed_files.is_empty() {
                print_failed_files(&report.failed_files);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
