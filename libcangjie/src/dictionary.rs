//! Cangjie word table and lookup.
//!
//! The table has one row per primary index. A row holds two parallel
//! vectors: the secondary index of every candidate, sorted ascending, and the
//! candidate characters in the same order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tcime_core::collation;
use tcime_core::{DictionaryStore, PackedTable, StoreError, WordDictionary};

use crate::table::{primary_index, secondary_index, PRIMARY_INDEX_COUNT};

/// Candidates sharing one primary index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRun {
    pub secondary: Vec<u32>,
    pub words: Vec<char>,
}

impl CodeRun {
    /// Candidates whose secondary index equals `secondary`, in table order.
    pub fn matching(&self, secondary: u32) -> &[char] {
        let start = self.secondary.partition_point(|&s| s < secondary);
        let end = self.secondary.partition_point(|&s| s <= secondary);
        &self.words[start..end]
    }
}

/// Packed Cangjie word table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CangjieTable {
    entries: Vec<Option<CodeRun>>,
}

impl CangjieTable {
    pub fn run(&self, primary: usize) -> Option<&CodeRun> {
        self.entries.get(primary).and_then(Option::as_ref)
    }

    /// Populated rows as `(primary index, run)`.
    pub fn runs(&self) -> impl Iterator<Item = (usize, &CodeRun)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, run)| run.as_ref().map(|run| (i, run)))
    }

    /// Total number of candidates across all rows.
    pub fn word_count(&self) -> usize {
        self.runs().map(|(_, run)| run.words.len()).sum()
    }
}

impl PackedTable for CangjieTable {
    const MAGIC: [u8; 4] = *b"TCCJ";
    const NAME: &'static str = "cangjie";

    fn validate(&self) -> Result<(), StoreError> {
        if self.entries.len() != PRIMARY_INDEX_COUNT {
            return Err(StoreError::Corrupt(format!(
                "expected {} rows, found {}",
                PRIMARY_INDEX_COUNT,
                self.entries.len()
            )));
        }
        for (primary, run) in self.runs() {
            if run.secondary.len() != run.words.len() {
                return Err(StoreError::Corrupt(format!(
                    "row {primary}: {} secondary indices for {} words",
                    run.secondary.len(),
                    run.words.len()
                )));
            }
            if run.secondary.windows(2).any(|w| w[0] > w[1]) {
                return Err(StoreError::Corrupt(format!(
                    "row {primary}: secondary indices not sorted"
                )));
            }
        }
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.runs().count()
    }
}

/// Builds a [`CangjieTable`] from `(code, character)` pairs.
///
/// Characters with the same code keep the order they were added in.
#[derive(Debug)]
pub struct CangjieTableBuilder {
    rows: Vec<Vec<(u32, char)>>,
}

impl Default for CangjieTableBuilder {
    fn default() -> Self {
        Self {
            rows: vec![Vec::new(); PRIMARY_INDEX_COUNT],
        }
    }
}

impl CangjieTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `word` under `code`. Returns `false` if the code is invalid.
    pub fn add(&mut self, code: &str, word: char) -> bool {
        let (Some(primary), Some(secondary)) = (primary_index(code), secondary_index(code)) else {
            return false;
        };
        self.rows[primary].push((secondary as u32, word));
        true
    }

    /// Add every character of `words` under `code`.
    pub fn add_words(&mut self, code: &str, words: &str) -> bool {
        words.chars().all(|w| self.add(code, w))
    }

    pub fn build(self) -> CangjieTable {
        let entries = self
            .rows
            .into_iter()
            .map(|mut row| {
                if row.is_empty() {
                    return None;
                }
                row.sort_by_key(|&(secondary, _)| secondary);
                let (secondary, words) = row.into_iter().unzip();
                Some(CodeRun { secondary, words })
            })
            .collect();
        CangjieTable { entries }
    }
}

/// Cangjie word dictionary.
#[derive(Debug)]
pub struct CangjieDictionary {
    store: DictionaryStore<CangjieTable>,
    simplified: bool,
}

impl CangjieDictionary {
    pub fn new(store: DictionaryStore<CangjieTable>) -> Self {
        Self {
            store,
            simplified: false,
        }
    }

    /// Start loading the table blob at `path` in the background.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(DictionaryStore::open(path))
    }

    pub fn from_table(table: CangjieTable) -> Self {
        Self::new(DictionaryStore::from_table(table))
    }

    pub fn is_simplified(&self) -> bool {
        self.simplified
    }

    pub fn set_simplified(&mut self, simplified: bool) {
        self.simplified = simplified;
    }

    /// Candidates for a Cangjie code.
    ///
    /// In simplified mode every candidate sharing the code's first and last
    /// letters is returned in Traditional Chinese collation order. Otherwise
    /// only candidates with exactly the code's middle letters are returned,
    /// in table order.
    pub fn words(&self, code: &str) -> String {
        let Some(primary) = primary_index(code) else {
            return String::new();
        };
        let Some(run) = self.store.get().and_then(|table| table.run(primary)) else {
            return String::new();
        };

        if self.simplified {
            let mut words = run.words.clone();
            collation::sort_chars(&mut words);
            return words.into_iter().collect();
        }

        match secondary_index(code) {
            Some(secondary) => run.matching(secondary as u32).iter().collect(),
            None => String::new(),
        }
    }
}

impl WordDictionary for CangjieDictionary {
    fn words(&self, input: &str) -> String {
        CangjieDictionary::words(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CangjieTable {
        let mut builder = CangjieTableBuilder::new();
        builder.add_words("卜口", "占");
        builder.add_words("人大口", "知佑");
        builder.add_words("人口", "仙");
        builder.add_words("人大大口", "俟");
        builder.add_words("人戈口", "佁");
        builder.build()
    }

    #[test]
    fn equal_secondary_keeps_insertion_order() {
        let dict = CangjieDictionary::from_table(table());
        assert_eq!(dict.words("人大口"), "知佑");
        assert_eq!(dict.words("人口"), "仙");
        assert_eq!(dict.words("人大大口"), "俟");
    }

    #[test]
    fn unknown_or_invalid_codes_are_empty() {
        let dict = CangjieDictionary::from_table(table());
        assert_eq!(dict.words("人心口"), "");
        assert_eq!(dict.words("日"), "");
        assert_eq!(dict.words("虫"), "");
        assert_eq!(dict.words("人虫口"), "");
        assert_eq!(dict.words(""), "");
    }

    #[test]
    fn simplified_returns_whole_row_collated() {
        let mut dict = CangjieDictionary::from_table(table());
        dict.set_simplified(true);
        // By stroke count: 仙 5, 佑 7, 佁 7 (second Big5 level), 知 8, 俟 9.
        assert_eq!(dict.words("人口"), "仙佑佁知俟");
    }

    #[test]
    fn builder_rejects_invalid_codes() {
        let mut builder = CangjieTableBuilder::new();
        assert!(!builder.add("", '一'));
        assert!(!builder.add("虫", '虫'));
        assert!(!builder.add("日日日日日日", '一'));
        assert!(builder.add("一", '一'));
        let table = builder.build();
        assert_eq!(table.entry_count(), 1);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn unsorted_row_fails_validation() {
        let mut table = table();
        let primary = primary_index("人口").unwrap();
        if let Some(run) = table.entries[primary].as_mut() {
            run.secondary.reverse();
        }
        assert!(matches!(table.validate(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn absent_table_returns_nothing() {
        let dict = CangjieDictionary::new(DictionaryStore::absent());
        assert_eq!(dict.words("卜口"), "");
    }
}
