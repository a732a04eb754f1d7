//! Zhuyin word table and lookup.
//!
//! One row per syllable cell. A row stores how many candidates each tone
//! has, followed by all candidates grouped by tone in tone order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tcime_core::{DictionaryStore, PackedTable, StoreError, WordDictionary};
use tracing::trace;

use crate::table::{strip_tone, syllables_index, tone_index, SYLLABLE_INDEX_COUNT, TONE_COUNT};

/// Candidates of one syllable, grouped by tone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneRun {
    pub counts: [u32; TONE_COUNT],
    pub words: Vec<char>,
}

impl ToneRun {
    /// Candidates for tone index `tone`.
    pub fn group(&self, tone: usize) -> &[char] {
        let start: usize = self.counts[..tone].iter().map(|&c| c as usize).sum();
        let len = self.counts[tone] as usize;
        &self.words[start..start + len]
    }

    /// First tone with any candidates.
    pub fn first_populated_tone(&self) -> Option<usize> {
        self.counts.iter().position(|&c| c > 0)
    }
}

/// Packed Zhuyin word table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZhuyinTable {
    entries: Vec<Option<ToneRun>>,
}

impl ZhuyinTable {
    pub fn run(&self, syllables: usize) -> Option<&ToneRun> {
        self.entries.get(syllables).and_then(Option::as_ref)
    }

    /// Populated rows as `(syllable index, run)`.
    pub fn runs(&self) -> impl Iterator<Item = (usize, &ToneRun)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, run)| run.as_ref().map(|run| (i, run)))
    }

    pub fn word_count(&self) -> usize {
        self.runs().map(|(_, run)| run.words.len()).sum()
    }
}

impl PackedTable for ZhuyinTable {
    const MAGIC: [u8; 4] = *b"TCZY";
    const NAME: &'static str = "zhuyin";

    fn validate(&self) -> Result<(), StoreError> {
        if self.entries.len() != SYLLABLE_INDEX_COUNT {
            return Err(StoreError::Corrupt(format!(
                "expected {} rows, found {}",
                SYLLABLE_INDEX_COUNT,
                self.entries.len()
            )));
        }
        for (index, run) in self.runs() {
            let total: u64 = run.counts.iter().map(|&c| u64::from(c)).sum();
            if total != run.words.len() as u64 {
                return Err(StoreError::Corrupt(format!(
                    "row {index}: tone counts add up to {total} but {} words stored",
                    run.words.len()
                )));
            }
        }
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.runs().count()
    }
}

/// Builds a [`ZhuyinTable`] from `(syllable with tone, character)` pairs.
#[derive(Debug)]
pub struct ZhuyinTableBuilder {
    rows: Vec<[Vec<char>; TONE_COUNT]>,
}

impl Default for ZhuyinTableBuilder {
    fn default() -> Self {
        Self {
            rows: vec![Default::default(); SYLLABLE_INDEX_COUNT],
        }
    }
}

impl ZhuyinTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `word` under `syllable`, e.g. "ㄇㄠˊ". Returns `false` if the
    /// syllable is invalid.
    pub fn add(&mut self, syllable: &str, word: char) -> bool {
        let Some((syllables, tone)) = strip_tone(syllable) else {
            return false;
        };
        let Some(index) = syllables_index(syllables) else {
            return false;
        };
        self.rows[index][tone_index(tone)].push(word);
        true
    }

    /// Add every character of `words` under `syllable`.
    pub fn add_words(&mut self, syllable: &str, words: &str) -> bool {
        words.chars().all(|w| self.add(syllable, w))
    }

    pub fn build(self) -> ZhuyinTable {
        let entries = self
            .rows
            .into_iter()
            .map(|groups| {
                if groups.iter().all(Vec::is_empty) {
                    return None;
                }
                let counts = groups.each_ref().map(|g| g.len() as u32);
                let words = groups.into_iter().flatten().collect();
                Some(ToneRun { counts, words })
            })
            .collect();
        ZhuyinTable { entries }
    }
}

/// Zhuyin word dictionary.
#[derive(Debug)]
pub struct ZhuyinDictionary {
    store: DictionaryStore<ZhuyinTable>,
}

impl ZhuyinDictionary {
    pub fn new(store: DictionaryStore<ZhuyinTable>) -> Self {
        Self { store }
    }

    /// Start loading the table blob at `path` in the background.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(DictionaryStore::open(path))
    }

    pub fn from_table(table: ZhuyinTable) -> Self {
        Self::new(DictionaryStore::from_table(table))
    }

    /// Candidates for a syllable with an optional trailing tone mark.
    ///
    /// If the requested tone has no candidates (including the untoned case),
    /// the first tone that has any is returned instead, so a syllable with
    /// candidates never comes back empty.
    pub fn words(&self, input: &str) -> String {
        let Some((syllables, tone)) = strip_tone(input) else {
            return String::new();
        };
        let Some(index) = syllables_index(syllables) else {
            return String::new();
        };
        let Some(run) = self.store.get().and_then(|table| table.run(index)) else {
            return String::new();
        };

        let requested = tone_index(tone);
        let tone = if run.counts[requested] > 0 {
            requested
        } else {
            match run.first_populated_tone() {
                Some(tone) => {
                    trace!(syllables, requested, tone, "tone has no candidates; falling back");
                    tone
                }
                None => return String::new(),
            }
        };
        run.group(tone).iter().collect()
    }
}

impl WordDictionary for ZhuyinDictionary {
    fn words(&self, input: &str) -> String {
        ZhuyinDictionary::words(self, input)
    }
}
