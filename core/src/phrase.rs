//! Follow-word suggestions after a character has been committed.
//!
//! The system phrase table stores, for every lookup character, the run of
//! characters that commonly follow it:
//!
//! ```text
//! phrases: Aa, Aa', Bb, Bb', Cc
//! keys:    [A, B, C]
//! offsets: [0, 2, 4]
//! follows: [a, a', b, b', c]
//! ```
//!
//! On top of it the phrase dictionary keeps an override table derived from the
//! user's own word list. User suggestions come first; system suggestions
//! already offered by the user table are dropped.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{DictionaryStore, PackedTable};
use crate::userdict::{SubscriptionId, UserDictionarySource};

/// Immutable phrase table: sorted lookup characters, their offsets into the
/// flat follow array, and the follow array itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseTable {
    keys: Vec<char>,
    offsets: Vec<u32>,
    follows: Vec<char>,
}

impl PhraseTable {
    /// Assemble a table from its three arrays, checking the invariants.
    pub fn from_parts(
        keys: Vec<char>,
        offsets: Vec<u32>,
        follows: Vec<char>,
    ) -> Result<Self, StoreError> {
        let table = Self {
            keys,
            offsets,
            follows,
        };
        table.validate()?;
        Ok(table)
    }

    /// Characters that follow `c` in the system phrases, in table order.
    pub fn following(&self, c: char) -> &[char] {
        let Ok(index) = self.keys.binary_search(&c) else {
            return &[];
        };
        let start = self.offsets[index] as usize;
        let end = self
            .offsets
            .get(index + 1)
            .map_or(self.follows.len(), |&next| next as usize);
        &self.follows[start..end]
    }

    /// Number of lookup characters.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate `(key, follows)` runs in key order.
    pub fn runs(&self) -> impl Iterator<Item = (char, &[char])> + '_ {
        self.keys.iter().map(move |&k| (k, self.following(k)))
    }
}

impl PackedTable for PhraseTable {
    const MAGIC: [u8; 4] = *b"TCPH";
    const NAME: &'static str = "phrases";

    fn validate(&self) -> Result<(), StoreError> {
        if self.keys.len() != self.offsets.len() {
            return Err(StoreError::Corrupt(format!(
                "{} lookup characters but {} offsets",
                self.keys.len(),
                self.offsets.len()
            )));
        }
        if let Some(w) = self.keys.windows(2).find(|w| w[0] >= w[1]) {
            return Err(StoreError::Corrupt(format!(
                "lookup characters not strictly ascending at {:?}",
                w[1]
            )));
        }
        if self.offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(StoreError::Corrupt("offsets decrease".into()));
        }
        if let Some(&last) = self.offsets.last() {
            if last as usize > self.follows.len() {
                return Err(StoreError::Corrupt(format!(
                    "offset {} past the end of {} follow characters",
                    last,
                    self.follows.len()
                )));
            }
        }
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.keys.len()
    }
}

/// Builds a [`PhraseTable`] from a list of multi-character phrases.
///
/// Every adjacent pair of a phrase contributes one (preceding -> following)
/// link. A link is recorded once per key, at its first appearance.
#[derive(Debug, Default)]
pub struct PhraseTableBuilder {
    links: BTreeMap<char, Vec<char>>,
}

impl PhraseTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every adjacent pair of `phrase`. Phrases shorter than two
    /// characters are ignored.
    pub fn add_phrase(&mut self, phrase: &str) -> &mut Self {
        let chars: Vec<char> = phrase.chars().collect();
        for pair in chars.windows(2) {
            self.add_link(pair[0], pair[1]);
        }
        self
    }

    /// Record that `follow` may follow `key`.
    pub fn add_link(&mut self, key: char, follow: char) -> &mut Self {
        let run = self.links.entry(key).or_default();
        if !run.contains(&follow) {
            run.push(follow);
        }
        self
    }

    pub fn build(self) -> PhraseTable {
        let mut keys = Vec::with_capacity(self.links.len());
        let mut offsets = Vec::with_capacity(self.links.len());
        let mut follows = Vec::new();
        for (key, run) in self.links {
            keys.push(key);
            offsets.push(follows.len() as u32);
            follows.extend(run);
        }
        PhraseTable {
            keys,
            offsets,
            follows,
        }
    }
}

/// Follow characters derived from the user's word list.
///
/// A word of length N contributes N-1 (preceding -> following) pairs, so
/// "ABCD" yields A->B, B->C, C->D. Values for the same key are concatenated
/// in encounter order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    follows: AHashMap<char, String>,
}

impl OverrideTable {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut follows: AHashMap<char, String> = AHashMap::new();
        for word in words {
            let chars: Vec<char> = word.as_ref().chars().collect();
            for pair in chars.windows(2) {
                follows.entry(pair[0]).or_default().push(pair[1]);
            }
        }
        Self { follows }
    }

    pub fn get(&self, c: char) -> Option<&str> {
        self.follows.get(&c).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.follows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.follows.is_empty()
    }
}

/// The user word list bound to a phrase dictionary.
struct UserOverrides {
    source: Arc<dyn UserDictionarySource>,
    locale: String,
    stale: Arc<AtomicBool>,
    table: Mutex<OverrideTable>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl UserOverrides {
    fn lock_table(&self) -> MutexGuard<'_, OverrideTable> {
        self.table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Follow characters for `c`, rebuilding the table first if the source
    /// changed. Reload and read happen under the same lock.
    fn following(&self, c: char) -> Option<String> {
        let mut table = self.lock_table();
        if self.stale.swap(false, Ordering::AcqRel) {
            match self.source.words(&self.locale) {
                Ok(words) => {
                    *table = OverrideTable::from_words(&words);
                    debug!(
                        words = words.len(),
                        keys = table.len(),
                        "reloaded user dictionary"
                    );
                }
                Err(e) => warn!(error = %e, "couldn't query the user dictionary; keeping previous entries"),
            }
        }
        table.get(c).map(str::to_string)
    }

    fn close(&self) {
        let id = self
            .subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(id) = id {
            self.source.unsubscribe(id);
        }
    }
}

/// Provides following-word suggestions for a committed character.
pub struct PhraseDictionary {
    store: DictionaryStore<PhraseTable>,
    user: Option<UserOverrides>,
}

impl PhraseDictionary {
    /// A phrase dictionary backed only by the system table.
    pub fn new(store: DictionaryStore<PhraseTable>) -> Self {
        Self { store, user: None }
    }

    /// Start loading the phrase blob at `path` in the background.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(DictionaryStore::open(path))
    }

    /// A phrase dictionary that also learns from `source`.
    ///
    /// Subscribes to `source` for change notifications; the override table is
    /// built on the first lookup and rebuilt on the first lookup after each
    /// change.
    pub fn with_user_dictionary(
        store: DictionaryStore<PhraseTable>,
        source: Arc<dyn UserDictionarySource>,
        locale: impl Into<String>,
    ) -> Self {
        let stale = Arc::new(AtomicBool::new(true));
        let flag = stale.clone();
        let id = source.subscribe(Arc::new(move || flag.store(true, Ordering::Release)));
        Self {
            store,
            user: Some(UserOverrides {
                source,
                locale: locale.into(),
                stale,
                table: Mutex::new(OverrideTable::default()),
                subscription: Mutex::new(Some(id)),
            }),
        }
    }

    /// Force the override table to be rebuilt on the next lookup.
    pub fn invalidate_user_dictionary(&self) {
        if let Some(user) = &self.user {
            user.stale.store(true, Ordering::Release);
        }
    }

    /// Characters likely to follow `c`, user suggestions first.
    ///
    /// Blocks on the first call until the system table has loaded. Returns an
    /// empty string if nothing is known about `c`.
    pub fn following_words(&self, c: char) -> String {
        let table = self.store.get();

        let mut words = self
            .user
            .as_ref()
            .and_then(|user| user.following(c))
            .unwrap_or_default();

        if let Some(table) = table {
            let system = table.following(c);
            if words.is_empty() {
                words.extend(system);
            } else {
                let offered: AHashSet<char> = words.chars().collect();
                words.extend(system.iter().filter(|f| !offered.contains(f)));
            }
        }
        words
    }

    /// Release the change subscription. Safe to call more than once.
    pub fn close(&self) {
        if let Some(user) = &self.user {
            user.close();
        }
    }
}

impl Drop for PhraseDictionary {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PhraseDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseDictionary")
            .field("store", &self.store)
            .field("user_dictionary", &self.user.is_some())
            .finish()
    }
}
