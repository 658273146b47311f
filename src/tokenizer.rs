use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

///Normalizes a raw word: lowercases it and drops every char that is not a letter.
/// # Example
/// ```
/// use word_stat::tokenizer::normalize;
/// assert_eq!(normalize("Hello,"), "hello");
/// assert_eq!(normalize("(R2-D2)"), "rd");
/// assert_eq!(normalize("1984"), "");
/// ```
pub fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ordered list of normalized words taken from a file or from raw words.
///
/// Words that normalize to nothing are dropped. The list can be read as many
/// times as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenizer {
    words: Vec<String>,
}

impl Tokenizer {
    /// Reads `path` line by line, splitting each line on whitespace.
    ///
    /// Bytes that are not valid UTF-8 are discarded rather than failing the read.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut tokenizer = Self::default();
        tokenizer.read_file(path.as_ref())?;
        Ok(tokenizer)
    }

    /// Reads several files in order into one word list.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> std::io::Result<Self> {
        let mut tokenizer = Self::default();
        for path in paths {
            tokenizer.read_file(path.as_ref())?;
        }
        Ok(tokenizer)
    }

    pub fn from_words<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut tokenizer = Self::default();
        tokenizer.extend(raw.iter().map(|w| w.as_ref()));
        tokenizer
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn read_file(&mut self, path: &Path) -> std::io::Result<()> {
        let mut reader = BufReader::new(File::open(path)?);
        let before = self.words.len();
        let mut line = Vec::new();
        while reader.read_until(b'\n', &mut line)? > 0 {
            // invalid UTF-8 becomes U+FFFD, which `normalize` drops
            self.extend(String::from_utf8_lossy(&line).split_whitespace());
            line.clear();
        }
        debug!(
            "read {} words from {}",
            self.words.len() - before,
            path.display()
        );
        Ok(())
    }

    fn extend<'a>(&mut self, raw: impl Iterator<Item = &'a str>) {
        self.words
            .extend(raw.map(normalize).filter(|word| !word.is_empty()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("hello"), "hello");
        assert_eq!(normalize("HeLLo"), "hello");
        assert_eq!(normalize("don't"), "dont");
        assert_eq!(normalize("well-known!?"), "wellknown");
        assert_eq!(normalize("a1b2c3"), "abc");
        assert_eq!(normalize("\t"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_from_words_drops_empty() {
        let t = Tokenizer::from_words(&["The", "42", "Fitnessgram", "--", "Pacer", "Test."]);
        assert_eq!(t.words(), ["the", "fitnessgram", "pacer", "test"]);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_from_words_empty() {
        let t = Tokenizer::from_words::<&str>(&[]);
        assert!(t.is_empty());
    }

    #[test]
    fn test_from_file_reading_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "The FitnessGram Pacer Test").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "is a multistage   aerobic\tcapacity test, 20 meters.").unwrap();
        let t = Tokenizer::from_file(file.path()).unwrap();
        assert_eq!(
            t.words(),
            [
                "the",
                "fitnessgram",
                "pacer",
                "test",
                "is",
                "a",
                "multistage",
                "aerobic",
                "capacity",
                "test",
                "meters"
            ]
        );
    }

    #[test]
    fn test_from_files_concatenates() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        let mut b = tempfile::NamedTempFile::new().unwrap();
        writeln!(a, "one two").unwrap();
        writeln!(b, "three").unwrap();
        let t = Tokenizer::from_files(&[a.path(), b.path()]).unwrap();
        assert_eq!(t.words(), ["one", "two", "three"]);
    }

    #[test]
    fn test_from_file_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"the caf\xe9 the end\nhello hello\n").unwrap();
        let t = Tokenizer::from_file(file.path()).unwrap();
        assert_eq!(t.words(), ["the", "caf", "the", "end", "hello", "hello"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Tokenizer::from_file(dir.path().join("nope.txt")).is_err());
    }
}
