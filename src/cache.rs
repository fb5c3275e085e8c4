//! Caller-owned memo of parse results keyed by content hash.
//!
//! Hits and misses only change cost, never output. Without a capacity the
//! cache grows without bound; with one, the least recently used entry is
//! evicted first.

use crate::parser::{parse, ParseOutcome};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of `text`.
pub fn content_key(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[derive(Debug, Default)]
pub struct ParseCache {
    /// Least recently used first.
    entries: IndexMap<String, ParseOutcome>,
    capacity: Option<usize>,
    hits: u64,
    misses: u64,
}

impl ParseCache {
    pub fn unbounded() -> Self {
        ParseCache::default()
    }

    /// A cache holding at most `capacity` parse results (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        ParseCache {
            capacity: Some(capacity.max(1)),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Parse `text`, reusing a previous result for identical content.
    pub fn get_or_parse(&mut self, text: &str) -> &ParseOutcome {
        let key = content_key(text);
        if let Some(idx) = self.entries.get_index_of(&key) {
            self.hits += 1;
            let last = self.entries.len() - 1;
            self.entries.move_index(idx, last);
        } else {
            self.misses += 1;
            if let Some(cap) = self.capacity {
                while self.entries.len() >= cap {
                    if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                        log::debug!("parse cache: evicted {}", &evicted[..12]);
                    }
                }
            }
        }
        self.entries.entry(key).or_insert_with(|| parse(text))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_hits() {
        let mut cache = ParseCache::unbounded();
        let first = cache.get_or_parse(">a\nACGT\n").clone();
        let second = cache.get_or_parse(">a\nACGT\n").clone();
        assert_eq!(first, second);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cached_result_matches_fresh_parse() {
        let text = ">A/duck/Laos/1/2020|H5N6\nACGT\n>bad\n";
        let mut cache = ParseCache::with_capacity(2);
        assert_eq!(cache.get_or_parse(text), &parse(text));
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut cache = ParseCache::with_capacity(2);
        cache.get_or_parse(">a\nA\n");
        cache.get_or_parse(">b\nC\n");
        cache.get_or_parse(">a\nA\n");
        cache.get_or_parse(">c\nG\n");
        assert_eq!(cache.len(), 2);
        // ">b" was least recently used, so asking again is a miss
        cache.get_or_parse(">b\nC\n");
        assert_eq!(cache.stats(), (1, 4));
    }

    #[test]
    fn key_is_hex_sha256() {
        assert_eq!(content_key("").len(), 64);
        assert_ne!(content_key("a"), content_key("b"));
    }
}
