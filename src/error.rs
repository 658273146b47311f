//! Error type for word statistics queries.
//!
//! Count lookups never fail (a missing word simply has count 0). Queries that
//! only make sense for data that exists return a [`StatsError`] instead:
//!
//! - [`StatsError::NotFound`]: rank of a word or pair that does not occur.
//! - [`StatsError::TooLarge`]: more results requested than are available.
//! - [`StatsError::UnsupportedDirection`]: collocation direction other than `1` or `-1`.
//!
//! ```
//! use word_stat::{StatsError, WordStat};
//!
//! let stat = WordStat::from_words(&["hello", "hello", "world"]);
//! assert_eq!(stat.word_rank("hello"), Ok(1));
//! assert!(matches!(stat.word_rank("bye"), Err(StatsError::NotFound(_))));
//! assert!(matches!(stat.most_common_words(3), Err(StatsError::TooLarge { .. })));
//! ```

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The word or word pair does not occur in the text.
    NotFound(String),
    /// `requested` results were asked for but only `available` exist.
    TooLarge { requested: usize, available: usize },
    /// Collocation direction was neither `1` (following) nor `-1` (preceding).
    UnsupportedDirection(i32),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::NotFound(key) => write!(f, "'{key}' does not occur in the text"),
            StatsError::TooLarge {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} results but only {available} are available"
            ),
            StatsError::UnsupportedDirection(direction) => write!(
                f,
                "unsupported collocation direction {direction} (expected 1 or -1)"
            ),
        }
    }
}

impl std::error::Error for StatsError {}
