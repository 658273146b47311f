//! Word and word-pair statistics built on [`HashTable`].
//!
//! Construction runs once: counts are accumulated in two tables (words and
//! adjacent pairs), each table's entries are sorted by count, and the sorted
//! lists are re-inserted into rank tables so a rank lookup is a single `get`.
//! Everything is read-only afterwards.

use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::error::StatsError;
use crate::hash_table::HashTable;
use crate::tokenizer::Tokenizer;

/// A table entry as seen by the sorted views: the shared key and the value it
/// had when the list was sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedEntry {
    key: Rc<str>,
    value: i64,
}

impl SortedEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

/// Which neighbour of the base word a collocation query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The word right after the base word (`1`).
    Following,
    /// The word right before the base word (`-1`).
    Preceding,
}

impl TryFrom<i32> for Direction {
    type Error = StatsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Following),
            -1 => Ok(Direction::Preceding),
            other => Err(StatsError::UnsupportedDirection(other)),
        }
    }
}

/// Counts every word with `put(word, 1)`, so repeats accumulate.
pub fn hash_words(words: &[String]) -> HashTable {
    let mut table = HashTable::new();
    for word in words {
        table.put(word, 1);
    }
    table
}

/// Counts every adjacent pair as the key `"w1 w2"`. Pairs are ordered:
/// `"a b"` and `"b a"` are different keys.
pub fn hash_word_pairs(words: &[String]) -> HashTable {
    let mut table = HashTable::new();
    for pair in words.windows(2) {
        table.put(&format!("{} {}", pair[0], pair[1]), 1);
    }
    table
}

/// Entries of `table` sorted by ascending value.
///
/// Entries are collected in bucket-scan order and the sort is stable, so
/// equal values keep that order. Index 0 is the least frequent entry.
pub fn sort_entries(table: &HashTable) -> Vec<SortedEntry> {
    let mut sorted: Vec<SortedEntry> = table
        .entries()
        .map(|entry| SortedEntry {
            key: entry.shared_key(),
            value: entry.value(),
        })
        .collect();
    sorted.sort_by_key(SortedEntry::value);
    sorted
}

/// Rank table for an ascending list: index `i` gets rank `len - i`, so the
/// last (most frequent) entry has rank 1.
pub fn rank_table_from(sorted: &[SortedEntry]) -> HashTable {
    let mut ranks = HashTable::new();
    let size = sorted.len() as i64;
    for (i, entry) in sorted.iter().enumerate() {
        ranks.put(entry.key(), size - i as i64);
    }
    ranks
}

/// Frequency and rank statistics over a tokenized text.
///
/// # Example
/// ```
/// use word_stat::WordStat;
///
/// let stat = WordStat::from_words(&["hello", "hello", "world"]);
/// assert_eq!(stat.word_count("hello"), 2);
/// assert_eq!(stat.word_rank("world"), Ok(2));
/// assert_eq!(stat.most_common_words(2).unwrap(), vec!["hello", "world"]);
/// ```
#[derive(Debug, Clone)]
pub struct WordStat {
    word_table: HashTable,
    pair_table: HashTable,
    sorted_words: Vec<SortedEntry>,
    sorted_pairs: Vec<SortedEntry>,
    word_ranks: HashTable,
    pair_ranks: HashTable,
}

impl WordStat {
    pub fn from_tokenizer(tokenizer: &Tokenizer) -> Self {
        let word_table = hash_words(tokenizer.words());
        let pair_table = hash_word_pairs(tokenizer.words());
        let sorted_words = sort_entries(&word_table);
        let sorted_pairs = sort_entries(&pair_table);
        let word_ranks = rank_table_from(&sorted_words);
        let pair_ranks = rank_table_from(&sorted_pairs);
        debug!(
            "built statistics: {} tokens, {} distinct words, {} distinct pairs",
            tokenizer.len(),
            sorted_words.len(),
            sorted_pairs.len()
        );
        Self {
            word_table,
            pair_table,
            sorted_words,
            sorted_pairs,
            word_ranks,
            pair_ranks,
        }
    }

    /// Normalizes `raw` words and builds the statistics.
    pub fn from_words<S: AsRef<str>>(raw: &[S]) -> Self {
        Self::from_tokenizer(&Tokenizer::from_words(raw))
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self::from_tokenizer(&Tokenizer::from_file(path)?))
    }

    /// Number of distinct words.
    pub fn distinct_words(&self) -> usize {
        self.sorted_words.len()
    }

    /// Number of distinct adjacent pairs.
    pub fn distinct_pairs(&self) -> usize {
        self.sorted_pairs.len()
    }

    /// Occurrences of `word`, 0 if it never occurs.
    pub fn word_count(&self, word: &str) -> i64 {
        self.word_table.get(word).unwrap_or(0)
    }

    /// Occurrences of `w1` directly followed by `w2`, 0 if none.
    pub fn word_pair_count(&self, w1: &str, w2: &str) -> i64 {
        self.pair_table.get(&pair_key(w1, w2)).unwrap_or(0)
    }

    /// 1-based frequency rank of `word` (1 = most frequent).
    pub fn word_rank(&self, word: &str) -> Result<i64, StatsError> {
        self.word_ranks
            .get(word)
            .ok_or_else(|| StatsError::NotFound(word.to_string()))
    }

    pub fn word_pair_rank(&self, w1: &str, w2: &str) -> Result<i64, StatsError> {
        let key = pair_key(w1, w2);
        self.pair_ranks.get(&key).ok_or(StatsError::NotFound(key))
    }

    /// The `k` most frequent words, most frequent first.
    pub fn most_common_words(&self, k: usize) -> Result<Vec<String>, StatsError> {
        check_available(k, self.sorted_words.len())?;
        Ok(keys(self.sorted_words.iter().rev().take(k)))
    }

    /// The `k` least frequent words, least frequent first.
    pub fn least_common_words(&self, k: usize) -> Result<Vec<String>, StatsError> {
        check_available(k, self.sorted_words.len())?;
        Ok(keys(self.sorted_words.iter().take(k)))
    }

    /// The `k` most frequent pairs as `"w1 w2"`, most frequent first.
    pub fn most_common_word_pairs(&self, k: usize) -> Result<Vec<String>, StatsError> {
        check_available(k, self.sorted_pairs.len())?;
        Ok(keys(self.sorted_pairs.iter().rev().take(k)))
    }

    /// The `k` words most often found right after (`direction == 1`) or right
    /// before (`direction == -1`) `base_word`, most frequent first.
    ///
    /// Fails with [`StatsError::TooLarge`] both when there are fewer than `k`
    /// pairs at all and when `base_word` has fewer than `k` collocations.
    pub fn most_common_collocs(
        &self,
        k: usize,
        base_word: &str,
        direction: i32,
    ) -> Result<Vec<String>, StatsError> {
        let direction = Direction::try_from(direction)?;
        check_available(k, self.sorted_pairs.len())?;

        let prefix = format!("{base_word} ");
        let suffix = format!(" {base_word}");
        let mut collocs = Vec::with_capacity(k);
        for entry in self.sorted_pairs.iter().rev() {
            if collocs.len() == k {
                break;
            }
            let other = match direction {
                Direction::Following => entry.key().strip_prefix(prefix.as_str()),
                Direction::Preceding => entry.key().strip_suffix(suffix.as_str()),
            };
            if let Some(word) = other {
                collocs.push(word.to_string());
            }
        }

        if collocs.len() < k {
            return Err(StatsError::TooLarge {
                requested: k,
                available: collocs.len(),
            });
        }
        Ok(collocs)
    }

    /// `(word, count, rank)` for every distinct word, most frequent first.
    pub fn word_frequencies(&self) -> Vec<(&str, i64, i64)> {
        ranked(&self.sorted_words)
    }

    /// `(pair, count, rank)` for every distinct pair, most frequent first.
    pub fn pair_frequencies(&self) -> Vec<(&str, i64, i64)> {
        ranked(&self.sorted_pairs)
    }
}

fn pair_key(w1: &str, w2: &str) -> String {
    format!("{w1} {w2}")
}

fn check_available(requested: usize, available: usize) -> Result<(), StatsError> {
    if requested > available {
        return Err(StatsError::TooLarge {
            requested,
            available,
        });
    }
    Ok(())
}

fn keys<'a>(entries: impl Iterator<Item = &'a SortedEntry>) -> Vec<String> {
    entries.map(|e| e.key().to_string()).collect()
}

fn ranked(sorted: &[SortedEntry]) -> Vec<(&str, i64, i64)> {
    sorted
        .iter()
        .rev()
        .enumerate()
        .map(|(i, e)| (e.key(), e.value(), i as i64 + 1))
        .collect()
}
