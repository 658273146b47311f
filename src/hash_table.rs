//! A string-keyed counting table using closed addressing.
//!
//! Every bucket holds at most one *head* entry plus an ordered list of
//! *overflow* entries whose keys collided into the same slot. Overflow
//! entries never own further overflow, so chains are exactly one level deep.
//!
//! Inserting a key that is already present increments its value by one
//! instead of replacing it; this is what lets the table double as a word
//! counter. Use [`HashTable::update`] to overwrite a value.

use std::rc::Rc;

use log::debug;

/// Capacity used by [`HashTable::new`] and when growing a zero-capacity table.
pub const DEFAULT_CAPACITY: usize = 100;

/// Ratio of occupied buckets to capacity that triggers a rehash.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Word-derived hash: `h = 31 * h + c` over the key's chars, wrapping at 32 bits.
///
/// # Example
/// ```
/// use word_stat::hash_table::word_hash;
/// assert_eq!(word_hash(""), 0);
/// assert_eq!(word_hash("a"), 97);
/// assert_eq!(word_hash("ab"), 97 * 31 + 98);
/// ```
pub fn word_hash(key: &str) -> i32 {
    key.chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

/// Maps a (possibly negative) hash code onto a bucket index.
fn bucket_index(hash_code: i32, capacity: usize) -> usize {
    hash_code.unsigned_abs() as usize % capacity
}

/// A key and its counter.
///
/// The key is shared (`Rc<str>`) so sorted views of a table can point at it
/// without copying the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: Rc<str>,
    value: i64,
}

impl Entry {
    fn new(key: &str, value: i64) -> Self {
        Self {
            key: Rc::from(key),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared handle to the key.
    pub fn shared_key(&self) -> Rc<str> {
        Rc::clone(&self.key)
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

/// One occupied slot: the head entry and the entries chained behind it.
#[derive(Debug, Clone)]
pub struct Bucket {
    head: Entry,
    overflow: Vec<Entry>,
}

impl Bucket {
    pub fn head(&self) -> &Entry {
        &self.head
    }

    pub fn overflow(&self) -> &[Entry] {
        &self.overflow
    }

    pub fn has_chain(&self) -> bool {
        !self.overflow.is_empty()
    }

    /// Head first, then overflow in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        std::iter::once(&self.head).chain(self.overflow.iter())
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        self.entries().find(|e| e.key() == key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Entry> {
        if self.head.key() == key {
            return Some(&mut self.head);
        }
        self.overflow.iter_mut().find(|e| e.key() == key)
    }
}

/// Fixed-bucket hash table from `String` keys to `i64` values.
///
/// Also serves as the rank table of [`crate::WordStat`]: same structure,
/// values are 1-based ranks instead of counts.
#[derive(Debug, Clone)]
pub struct HashTable {
    buckets: Vec<Option<Bucket>>,
    load_factor: f64,
    // occupied buckets; overflow entries are not counted
    filled: usize,
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HashTable {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with exactly `capacity` buckets. Zero is allowed;
    /// the first insertion then grows the table to [`DEFAULT_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: empty_buckets(capacity),
            load_factor: DEFAULT_LOAD_FACTOR,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of occupied buckets.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Number of entries, chained ones included.
    pub fn len(&self) -> usize {
        self.buckets.iter().flatten().map(|b| 1 + b.overflow.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn set_load_factor(&mut self, load_factor: f64) {
        self.load_factor = load_factor;
    }

    /// Raw bucket array, in index order.
    pub fn buckets(&self) -> &[Option<Bucket>] {
        &self.buckets
    }

    /// All entries in bucket-scan order: each head followed by its chain.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.buckets.iter().flatten().flat_map(Bucket::entries)
    }

    /// Inserts `key` with `value`, or increments the existing value by one.
    ///
    /// # Example
    /// ```
    /// use word_stat::HashTable;
    /// let mut table = HashTable::new();
    /// table.put("fox", 1);
    /// table.put("fox", 1);
    /// table.put("fox", 1);
    /// assert_eq!(table.get("fox"), Some(3));
    /// ```
    pub fn put(&mut self, key: &str, value: i64) {
        self.put_with_hash(key, value, word_hash(key));
    }

    /// Same as [`HashTable::put`] with an explicit hash code, which decides the
    /// bucket as `|hash_code| mod capacity`.
    pub fn put_with_hash(&mut self, key: &str, value: i64, hash_code: i32) {
        if self.capacity() == 0 || self.would_overflow(hash_code) {
            self.rehash();
        }
        self.place(key, value, hash_code);
    }

    /// Overwrites the value of `key`, inserting it with `value` if absent.
    pub fn update(&mut self, key: &str, value: i64) {
        let hash_code = word_hash(key);
        match self.entry_mut(key, hash_code) {
            Some(entry) => entry.value = value,
            None => self.put_with_hash(key, value, hash_code),
        }
    }

    /// Value stored for `key`, `None` if absent.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.get_with_hash(key, word_hash(key))
    }

    pub fn get_with_hash(&self, key: &str, hash_code: i32) -> Option<i64> {
        if self.capacity() == 0 {
            return None;
        }
        self.buckets[bucket_index(hash_code, self.capacity())]
            .as_ref()
            .and_then(|bucket| bucket.find(key))
            .map(Entry::value)
    }

    /// Doubles the capacity and re-inserts every entry with its current value.
    /// A zero-capacity table is reset to [`DEFAULT_CAPACITY`] instead.
    pub fn rehash(&mut self) {
        let capacity = self.capacity();
        if capacity == 0 {
            debug!("growing empty table to {DEFAULT_CAPACITY} buckets");
            self.buckets = empty_buckets(DEFAULT_CAPACITY);
            self.filled = 0;
            return;
        }

        let mut grown = HashTable::with_capacity(capacity * 2);
        grown.load_factor = self.load_factor;
        for entry in self.entries() {
            grown.place(entry.key(), entry.value(), word_hash(entry.key()));
        }
        debug!(
            "rehashed table: {} -> {} buckets, {} filled",
            capacity,
            grown.capacity(),
            grown.filled
        );
        self.buckets = grown.buckets;
        self.filled = grown.filled;
    }

    /// True when occupying the (empty) target bucket would push the
    /// filled ratio above the load factor.
    fn would_overflow(&self, hash_code: i32) -> bool {
        let slot = &self.buckets[bucket_index(hash_code, self.capacity())];
        slot.is_none() && (self.filled + 1) as f64 / self.capacity() as f64 > self.load_factor
    }

    /// Insertion without any growth check.
    fn place(&mut self, key: &str, value: i64, hash_code: i32) {
        let index = bucket_index(hash_code, self.capacity());
        let slot = &mut self.buckets[index];
        match slot {
            None => {
                *slot = Some(Bucket {
                    head: Entry::new(key, value),
                    overflow: Vec::new(),
                });
                self.filled += 1;
            }
            Some(bucket) => match bucket.find_mut(key) {
                Some(entry) => entry.value += 1,
                None => bucket.overflow.push(Entry::new(key, value)),
            },
        }
    }

    fn entry_mut(&mut self, key: &str, hash_code: i32) -> Option<&mut Entry> {
        let capacity = self.capacity();
        if capacity == 0 {
            return None;
        }
        self.buckets[bucket_index(hash_code, capacity)]
            .as_mut()
            .and_then(|bucket| bucket.find_mut(key))
    }
}

fn empty_buckets(capacity: usize) -> Vec<Option<Bucket>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_in_bucket(table: &HashTable, index: usize) -> Vec<String> {
        table.buckets()[index]
            .as_ref()
            .map(|b| b.entries().map(|e| e.key().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_put_into_empty_table() {
        let mut table = HashTable::with_capacity(10);
        assert_eq!(table.get("hello"), None);

        table.put_with_hash("hello", 1, 3);
        assert_eq!(table.get_with_hash("hello", 3), Some(1));
        assert_eq!(table.filled(), 1);
        assert_eq!(keys_in_bucket(&table, 3), vec!["hello"]);
    }

    #[test]
    fn test_put_same_key_increments() {
        let mut table = HashTable::with_capacity(10);
        for n in 1..=5 {
            table.put_with_hash("hello", 1, 3);
            assert_eq!(table.get_with_hash("hello", 3), Some(n));
        }
        // the value argument is ignored once the key exists
        table.put_with_hash("hello", 42, 3);
        assert_eq!(table.get_with_hash("hello", 3), Some(6));
        assert_eq!(table.filled(), 1);
    }

    #[test]
    fn test_collisions_are_chained() {
        let mut table = HashTable::with_capacity(10);
        table.set_load_factor(1.0);
        table.put_with_hash("hello", 1, 3);
        table.put_with_hash("world", 5, 13);
        table.put_with_hash("my", 2, 23);

        let bucket = table.buckets()[3].as_ref().unwrap();
        assert!(bucket.has_chain());
        assert_eq!(bucket.head().key(), "hello");
        let chained: Vec<_> = bucket.overflow().iter().map(Entry::key).collect();
        assert_eq!(chained, vec!["world", "my"]);

        // chained entries do not count as filled buckets
        assert_eq!(table.filled(), 1);
        assert_eq!(table.len(), 3);

        assert_eq!(table.get_with_hash("world", 3), Some(5));
        assert_eq!(table.get_with_hash("my", 3), Some(2));
    }

    #[test]
    fn test_chained_key_increments() {
        let mut table = HashTable::with_capacity(10);
        table.put_with_hash("hello", 1, 3);
        table.put_with_hash("world", 1, 3);
        table.put_with_hash("my", 1, 3);
        table.put_with_hash("world", 1, 3);
        table.put_with_hash("my", 7, 3);

        assert_eq!(table.get_with_hash("hello", 3), Some(1));
        assert_eq!(table.get_with_hash("world", 3), Some(2));
        assert_eq!(table.get_with_hash("my", 3), Some(2));
        assert_eq!(keys_in_bucket(&table, 3), vec!["hello", "world", "my"]);
    }

    #[test]
    fn test_negative_hash_codes() {
        let mut table = HashTable::with_capacity(10);
        table.put_with_hash("neg", 1, -13);
        assert_eq!(keys_in_bucket(&table, 3), vec!["neg"]);
        assert_eq!(table.get_with_hash("neg", -13), Some(1));
        assert_eq!(table.get_with_hash("neg", 13), Some(1));

        table.put_with_hash("min", 1, i32::MIN);
        assert_eq!(table.get_with_hash("min", i32::MIN), Some(1));
    }

    #[test]
    fn test_get_missing() {
        let mut table = HashTable::with_capacity(10);
        table.put_with_hash("hello", 1, 3);
        assert_eq!(table.get_with_hash("world", 3), None);
        assert_eq!(table.get_with_hash("world", 4), None);
        assert_eq!(table.get("world"), None);
    }

    #[test]
    fn test_get_on_zero_capacity() {
        let table = HashTable::with_capacity(0);
        assert_eq!(table.get("anything"), None);
        assert_eq!(table.get_with_hash("anything", 7), None);
    }

    #[test]
    fn test_zero_capacity_put_grows_to_default() {
        let mut table = HashTable::with_capacity(0);
        table.put("hello", 1);
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.get("hello"), Some(1));
        assert_eq!(table.filled(), 1);
    }

    #[test]
    fn test_update_overwrites_or_inserts() {
        let mut table = HashTable::new();
        table.update("fresh", 9);
        assert_eq!(table.get("fresh"), Some(9));

        table.put("seen", 1);
        table.put("seen", 1);
        table.update("seen", 40);
        assert_eq!(table.get("seen"), Some(40));

        table.update("seen", -3);
        assert_eq!(table.get("seen"), Some(-3));
    }

    #[test]
    fn test_update_on_zero_capacity() {
        let mut table = HashTable::with_capacity(0);
        table.update("word", 5);
        assert_eq!(table.get("word"), Some(5));
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_rehash_preserves_content_and_doubles() {
        let mut table = HashTable::with_capacity(8);
        table.set_load_factor(10.0);
        let words = ["a", "bb", "ccc", "dddd", "eeeee", "ffffff", "g", "hh", "iii"];
        for (i, w) in words.iter().enumerate() {
            for _ in 0..=i {
                table.put(w, 1);
            }
        }
        let before: Vec<(String, i64)> = table
            .entries()
            .map(|e| (e.key().to_string(), e.value()))
            .collect();

        table.rehash();
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.len(), before.len());
        for (key, value) in &before {
            assert_eq!(table.get(key), Some(*value), "lost value for {key}");
        }

        table.rehash();
        assert_eq!(table.capacity(), 32);
        for (key, value) in &before {
            assert_eq!(table.get(key), Some(*value));
        }
    }

    #[test]
    fn test_rehash_empty_zero_capacity() {
        let mut table = HashTable::with_capacity(0);
        table.rehash();
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert!(table.is_empty());
    }

    #[test]
    fn test_rehash_counts_filled_buckets() {
        let mut table = HashTable::with_capacity(4);
        table.set_load_factor(10.0);
        table.put_with_hash("x", 1, 1);
        table.put_with_hash("y", 1, 1);
        assert_eq!(table.filled(), 1);
        table.rehash();
        let occupied = table.buckets().iter().filter(|b| b.is_some()).count();
        assert_eq!(table.filled(), occupied);
    }

    #[test]
    fn test_growth_keeps_load_factor() {
        let mut table = HashTable::new();
        for i in 0..2000 {
            table.put(&format!("word{i}"), 1);
            let ratio = table.filled() as f64 / table.capacity() as f64;
            assert!(ratio <= table.load_factor(), "ratio {ratio} after {i}");
        }
        assert_eq!(table.len(), 2000);
        for i in 0..2000 {
            assert_eq!(table.get(&format!("word{i}")), Some(1));
        }
    }

    #[test]
    fn test_growth_with_load_factor_one() {
        let mut table = HashTable::with_capacity(3);
        table.set_load_factor(1.0);
        table.put_with_hash("a", 1, 0);
        table.put_with_hash("b", 1, 1);
        table.put_with_hash("c", 1, 2);
        assert_eq!(table.capacity(), 3);
        table.put_with_hash("a", 1, 0);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.get_with_hash("a", 0), Some(2));
    }

    #[test]
    fn test_entries_scan_order() {
        let mut table = HashTable::with_capacity(10);
        table.put_with_hash("late", 1, 7);
        table.put_with_hash("early", 1, 2);
        table.put_with_hash("chained", 1, 2);
        let keys: Vec<_> = table.entries().map(Entry::key).collect();
        assert_eq!(keys, vec!["early", "chained", "late"]);
    }

    #[test]
    fn test_word_hash_wraps() {
        let long = "supercalifragilisticexpialidocious";
        let expected = long
            .chars()
            .fold(0i64, |h, c| (h * 31 + c as i64) as i32 as i64);
        assert_eq!(word_hash(long) as i64, expected);
    }
}
