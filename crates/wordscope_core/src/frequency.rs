use std::collections::HashMap;

/// Tokens shorter than this (in characters) are dropped by the default policy.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 2;
/// Number of rows in the default top-N view.
pub const DEFAULT_TOP_N: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankedEntry {
    pub token: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn new(token: impl Into<String>, count: u64) -> Self {
        Self {
            token: token.into(),
            count,
        }
    }
}

/// Token -> occurrence count, remembering the order in which tokens were first seen.
///
/// Filters never mutate the table; they return a new one that keeps the
/// original first-occurrence order, so ranking ties resolve the same way
/// before and after filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<RankedEntry>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for token in tokens {
            let token = token.as_ref();
            match table.index.get(token) {
                Some(&slot) => table.entries[slot].count += 1,
                None => {
                    table.index.insert(token.to_owned(), table.entries.len());
                    table.entries.push(RankedEntry::new(token, 1));
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.index.get(token).map(|&slot| self.entries[slot].count)
    }

    /// Entries in first-occurrence order.
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn max_count(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.count).max()
    }

    /// Sum of all counts; equals the number of tokens the table was built from.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Drops tokens with fewer than `min_length` characters.
    pub fn filter_by_length(&self, min_length: usize) -> Self {
        self.retain(|entry| entry.token.chars().count() >= min_length)
    }

    /// Drops entries counted fewer than `min_count` times.
    pub fn filter_by_frequency(&self, min_count: u64) -> Self {
        self.retain(|entry| entry.count >= min_count)
    }

    /// At most `n` entries, count descending, ties in first-occurrence order.
    pub fn top_n(&self, n: usize) -> Vec<RankedEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Every entry in ranking order.
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut ranked = self.entries.clone();
        // Stable sort keeps first-occurrence order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    fn retain(&self, keep: impl Fn(&RankedEntry) -> bool) -> Self {
        let mut table = Self::new();
        for entry in self.entries.iter().filter(|e| keep(e)) {
            table.index.insert(entry.token.clone(), table.entries.len());
            table.entries.push(entry.clone());
        }
        table
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}
