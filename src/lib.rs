//! # word_stat
//!
//! Word and word-pair frequency statistics over plain text, built on a
//! from-scratch chained hash table.
//!
//! - [`HashTable`]: string keys to `i64` counters, increment-on-insert, load-factor driven growth.
//! - [`Tokenizer`]: lowercased, letters-only words from a file or a word list.
//! - [`WordStat`]: counts, ranks, most/least common words and pairs, collocations.
//! - [`analyze_path`]: per-file or combined analysis with txt/csv/tsv/json export.
//!
//! ## Example
//! ```
//! use word_stat::WordStat;
//!
//! let stat = WordStat::from_words(&["hello", "my", "name", "hello", "is", "hello", "my"]);
//! assert_eq!(stat.word_count("hello"), 3);
//! assert_eq!(stat.most_common_collocs(2, "hello", 1).unwrap(), vec!["my", "is"]);
//! ```

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

pub mod error;
pub mod export;
pub mod hash_table;
pub mod tokenizer;
pub mod word_stat;

pub use error::StatsError;
pub use export::{ExportFormat, csv_safe_cell};
pub use hash_table::HashTable;
pub use tokenizer::Tokenizer;
pub use word_stat::{Direction, WordStat};

/// Settings for [`analyze_path`].
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Number of entries listed per summary section.
    pub top: usize,
    pub export_format: ExportFormat,
    /// Analyze all files as one text instead of one by one.
    pub combine: bool,
    /// Base word for a collocation section in the summary.
    pub colloc: Option<String>,
    /// `1` for following words, `-1` for preceding words.
    pub direction: i32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top: 20,
            export_format: ExportFormat::Txt,
            combine: false,
            colloc: None,
            direction: 1,
        }
    }
}

/// Result of [`analyze_path`].
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Human-readable summary of every analyzed source.
    pub summary: String,
    /// Files written by the export step.
    pub outputs: Vec<PathBuf>,
    /// Files that could not be read, with the reason.
    pub failed_files: Vec<(String, String)>,
}

///Returns the `.txt` files to analyze: `path` itself if it is a file, otherwise
///every `.txt` file below it, sorted.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("txt"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Analyzes the text file(s) at `path` and exports the frequency tables of
/// every analyzed source into `out_dir`.
///
/// Per-file mode skips unreadable files (listed in `failed_files`); combine
/// mode reads all files into one text and fails if any of them is unreadable.
/// Per-file exports are named after the file's path below `path`, so files
/// sharing a stem in different directories do not overwrite each other.
pub fn analyze_path(
    path: &Path,
    out_dir: &Path,
    opts: &AnalysisOptions,
) -> Result<AnalysisReport, String> {
    if !path.exists() {
        return Err(format!("Path not found: {}", path.display()));
    }
    if opts.colloc.is_some() {
        Direction::try_from(opts.direction).map_err(|e| e.to_string())?;
    }
    let files = collect_files(path);
    if files.is_empty() {
        return Err(format!("No .txt files found in {}", path.display()));
    }

    let stamp = export::timestamp();
    let mut report = AnalysisReport::default();

    if opts.combine {
        let tokenizer =
            Tokenizer::from_files(&files).map_err(|e| format!("Read failed: {e}"))?;
        info!("analyzing {} files combined", files.len());
        let stat = WordStat::from_tokenizer(&tokenizer);
        analyze_source("combined", &stat, out_dir, &stamp, opts, &mut report)?;
        return Ok(report);
    }

    let mut used = HashSet::new();
    for file in &files {
        let name = unique_name(source_name(path, file), &mut used);
        match Tokenizer::from_file(file) {
            Ok(tokenizer) => {
                info!("analyzing {}", file.display());
                let stat = WordStat::from_tokenizer(&tokenizer);
                analyze_source(&name, &stat, out_dir, &stamp, opts, &mut report)?;
            }
            Err(e) => {
                warn!("skipping {}: {}", file.display(), e);
                report
                    .failed_files
                    .push((file.display().to_string(), e.to_string()));
            }
        }
    }
    Ok(report)
}

/// Export name of `file`: its path below `root` without the extension, with
/// separators replaced by `_` (`nested/a.txt` becomes `nested_a`).
fn source_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
    let name = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_");
    if name.is_empty() {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "text".to_string())
    } else {
        name
    }
}

/// Appends `_2`, `_3`, ... until `name` differs from every name in `used`.
fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    let mut candidate = name.clone();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{name}_{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

fn analyze_source(
    name: &str,
    stat: &WordStat,
    out_dir: &Path,
    stamp: &str,
    opts: &AnalysisOptions,
    report: &mut AnalysisReport,
) -> Result<(), String> {
    report.summary.push_str(&render_summary(name, stat, opts)?);
    report.outputs.push(export::export_table(
        out_dir,
        name,
        stamp,
        "wordfreq",
        &stat.word_frequencies(),
        opts.export_format,
    )?);
    report.outputs.push(export::export_table(
        out_dir,
        name,
        stamp,
        "wordpairs",
        &stat.pair_frequencies(),
        opts.export_format,
    )?);
    Ok(())
}

/// Text summary of one source. Section sizes are capped at what the text has.
pub fn render_summary(
    name: &str,
    stat: &WordStat,
    opts: &AnalysisOptions,
) -> Result<String, String> {
    let words = opts.top.min(stat.distinct_words());
    let pairs = opts.top.min(stat.distinct_pairs());
    let mut out = format!(
        "=== {name}: {} distinct words, {} distinct word pairs ===\n",
        stat.distinct_words(),
        stat.distinct_pairs()
    );

    out.push_str(&format!("Top {words} words:\n"));
    for word in stat.most_common_words(words).map_err(|e| e.to_string())? {
        out.push_str(&format!("  {word}\t{}\n", stat.word_count(&word)));
    }

    out.push_str(&format!("Least common {words} words:\n"));
    for word in stat.least_common_words(words).map_err(|e| e.to_string())? {
        out.push_str(&format!("  {word}\t{}\n", stat.word_count(&word)));
    }

    out.push_str(&format!("Top {pairs} word pairs:\n"));
    for pair in stat.most_common_word_pairs(pairs).map_err(|e| e.to_string())? {
        let count = match pair.split_once(' ') {
            Some((w1, w2)) => stat.word_pair_count(w1, w2),
            None => 0,
        };
        out.push_str(&format!("  {pair}\t{count}\n"));
    }

    if let Some(base) = &opts.colloc {
        let collocs = match stat.most_common_collocs(pairs, base, opts.direction) {
            Ok(collocs) => collocs,
            Err(StatsError::TooLarge { available, .. }) => stat
                .most_common_collocs(available, base, opts.direction)
                .map_err(|e| e.to_string())?,
            Err(e) => return Err(e.to_string()),
        };
        let following = opts.direction == 1;
        out.push_str(&format!(
            "Top {} collocations of '{base}' ({}):\n",
            collocs.len(),
            if following { "following" } else { "preceding" }
        ));
        for word in collocs {
            let count = if following {
                stat.word_pair_count(base, &word)
            } else {
                stat.word_pair_count(&word, base)
            };
            out.push_str(&format!("  {word}\t{count}\n"));
        }
    }
    out.push('\n');
    Ok(out)
}

/// Prints the files that could not be analyzed to stderr.
pub fn print_failed_files(failed: &[(String, String)]) {
    eprintln!("Failed to analyze {} file(s):", failed.len());
    for (file, reason) in failed {
        eprintln!("  {file}: {reason}");
    }
}
