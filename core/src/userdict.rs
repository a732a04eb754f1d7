//! User dictionary sources.
//!
//! The phrase dictionary personalizes its follow-word suggestions from the
//! user's own word list. That list lives outside the engine and may change at
//! any time, so sources expose two things:
//!
//! - a locale-filtered query returning every stored word, and
//! - change notifications, so consumers can mark themselves stale.
//!
//! Two sources are provided:
//! - `InMemoryWordList`: thread-safe, used by tests and embedders that keep
//!   the word list elsewhere.
//! - `RedbWordList`: persistent, ACID-backed storage using `redb`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::error::UserDictError;

/// Callback invoked after the word list changed.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`UserDictionarySource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A queryable user word list with change notifications.
pub trait UserDictionarySource: Send + Sync {
    /// All words stored without a locale or with exactly `locale`, in
    /// storage order.
    fn words(&self, locale: &str) -> Result<Vec<String>, UserDictError>;

    /// Register `on_change` to be called after every modification.
    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId;

    /// Remove a subscription. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// One user dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWord {
    pub word: String,
    /// `None` means the word applies to every locale.
    #[serde(default)]
    pub locale: Option<String>,
}

impl UserWord {
    pub fn new<W: Into<String>>(word: W, locale: Option<&str>) -> Self {
        Self {
            word: word.into(),
            locale: locale.map(str::to_string),
        }
    }

    fn matches_locale(&self, locale: &str) -> bool {
        self.locale.as_deref().map_or(true, |l| l == locale)
    }
}

/// Normalize a user word (NFC) and trim surrounding whitespace.
pub fn normalize_word(s: &str) -> String {
    s.nfc().collect::<String>().trim().to_string()
}

/// Fan-out of change callbacks shared by the sources in this module.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<NotifierInner>,
}

#[derive(Default)]
struct NotifierInner {
    next_id: AtomicU64,
    observers: RwLock<Vec<(SubscriptionId, ChangeCallback)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.write_observers().push((id, on_change));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.write_observers();
        let before = observers.len();
        observers.retain(|(sid, _)| *sid != id);
        observers.len() != before
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.read_observers().len()
    }

    /// Call every subscriber. Callbacks run outside the lock so they may
    /// subscribe or unsubscribe themselves.
    pub fn notify(&self) {
        let callbacks: Vec<ChangeCallback> = self
            .read_observers()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb();
        }
    }

    fn read_observers(&self) -> RwLockReadGuard<'_, Vec<(SubscriptionId, ChangeCallback)>> {
        self.inner
            .observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_observers(&self) -> RwLockWriteGuard<'_, Vec<(SubscriptionId, ChangeCallback)>> {
        self.inner
            .observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A thread-safe in-memory user word list.
///
/// Words are returned in insertion order. Duplicates are allowed, as in a
/// user dictionary where the same word was saved for two locales.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWordList {
    inner: Arc<RwLock<Vec<UserWord>>>,
    notifier: ChangeNotifier,
}

impl InMemoryWordList {
    /// Create a new empty word list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a word list pre-filled with locale-independent words.
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = Self::new();
        if let Ok(mut inner) = list.inner.write() {
            inner.extend(
                words
                    .into_iter()
                    .map(|w| UserWord::new(normalize_word(w.as_ref()), None)),
            );
        }
        list
    }

    /// Add a word and notify subscribers.
    pub fn add_word(&self, word: &str, locale: Option<&str>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.push(UserWord::new(normalize_word(word), locale));
        }
        self.notifier.notify();
    }

    /// Remove every entry for `word`. Notifies subscribers if anything was
    /// removed.
    pub fn remove_word(&self, word: &str) -> bool {
        let word = normalize_word(word);
        let removed = match self.inner.write() {
            Ok(mut inner) => {
                let before = inner.len();
                inner.retain(|w| w.word != word);
                inner.len() != before
            }
            Err(_) => false,
        };
        if removed {
            self.notifier.notify();
        }
        removed
    }

    /// Remove all words and notify subscribers.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.clear();
        }
        self.notifier.notify();
    }

    /// Snapshot of every entry.
    pub fn entries(&self) -> Vec<UserWord> {
        self.inner.read().map(|w| w.clone()).unwrap_or_default()
    }

    /// Number of live change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

impl UserDictionarySource for InMemoryWordList {
    fn words(&self, locale: &str) -> Result<Vec<String>, UserDictError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| UserDictError::Unavailable("word list lock poisoned".into()))?;
        Ok(inner
            .iter()
            .filter(|w| w.matches_locale(locale))
            .map(|w| w.word.clone())
            .collect())
    }

    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId {
        self.notifier.subscribe(on_change)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

/// Redb-backed user word list.
///
/// Words are keys, so a word is stored at most once and words are returned in
/// key order. An empty locale value means "every locale".
pub struct RedbWordList {
    db: Database,
    path: PathBuf,
    notifier: ChangeNotifier,
}

impl RedbWordList {
    /// Table definition: word -> locale ("" for none).
    const TABLE_DEF: TableDefinition<'static, &'static str, &'static str> =
        TableDefinition::new("user_words");

    /// Create or open a redb database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, UserDictError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let db = Database::create(path)?;
        // Make sure the table exists so read transactions never fail on a
        // fresh database.
        let write_txn = db.begin_write()?;
        write_txn.open_table(Self::TABLE_DEF)?;
        write_txn.commit()?;
        debug!(path = %path.display(), "opened user word list");
        Ok(Self {
            db,
            path: path.to_path_buf(),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Path of the backing database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or update a word and notify subscribers.
    pub fn add_word(&self, word: &str, locale: Option<&str>) -> Result<(), UserDictError> {
        let word = normalize_word(word);
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            table.insert(word.as_str(), locale.unwrap_or(""))?;
        }
        write_txn.commit()?;
        self.notifier.notify();
        Ok(())
    }

    /// Remove a word. Notifies subscribers if it existed.
    pub fn remove_word(&self, word: &str) -> Result<bool, UserDictError> {
        let word = normalize_word(word);
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            let previous = table.remove(word.as_str())?;
            previous.is_some()
        };
        write_txn.commit()?;
        if removed {
            self.notifier.notify();
        }
        Ok(removed)
    }

    /// Every stored entry in key order.
    pub fn entries(&self) -> Result<Vec<UserWord>, UserDictError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::TABLE_DEF)?;
        let mut out = Vec::new();
        for item in table.iter()? {
            let (word, locale) = item?;
            let locale = locale.value();
            out.push(UserWord::new(
                word.value(),
                if locale.is_empty() { None } else { Some(locale) },
            ));
        }
        Ok(out)
    }
}

impl UserDictionarySource for RedbWordList {
    fn words(&self, locale: &str) -> Result<Vec<String>, UserDictError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|w| w.matches_locale(locale))
            .map(|w| w.word)
            .collect())
    }

    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId {
        self.notifier.subscribe(on_change)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

impl std::fmt::Debug for RedbWordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbWordList")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn in_memory_filters_by_locale() {
        let list = InMemoryWordList::new();
        list.add_word("綠茶", None);
        list.add_word("綠豆", Some("zh_TW"));
        list.add_word("绿色", Some("zh_CN"));
        assert_eq!(list.words("zh_TW").unwrap(), vec!["綠茶", "綠豆"]);
        assert_eq!(list.words("zh_CN").unwrap(), vec!["綠茶", "绿色"]);
    }

    #[test]
    fn notifier_survives_poisoned_lock() {
        let notifier = ChangeNotifier::new();
        let inner = notifier.inner.clone();
        let _ = std::thread::spawn(move || {
            let _observers = inner.observers.write().unwrap();
            panic!("poisoning the observer list");
        })
        .join();
        assert!(notifier.inner.observers.is_poisoned());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = notifier.subscribe(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(notifier.subscriber_count(), 1);
        notifier.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(notifier.unsubscribe(id));
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn in_memory_notifies_on_change() {
        let list = InMemoryWordList::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = list.subscribe(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        list.add_word("貓咪", None);
        assert!(list.remove_word("貓咪"));
        assert!(!list.remove_word("貓咪"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        list.add_word("貓咪", None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn words_are_normalized() {
        let list = InMemoryWordList::with_words(["  綠茶 "]);
        assert_eq!(list.words("zh_TW").unwrap(), vec!["綠茶"]);
    }

    #[test]
    fn redb_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.redb");
        let list = RedbWordList::open(&path).unwrap();
        assert!(list.words("zh_TW").unwrap().is_empty());

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        list.subscribe(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        list.add_word("綠茶", None).unwrap();
        list.add_word("貓熊", Some("zh_CN")).unwrap();
        assert_eq!(list.words("zh_TW").unwrap(), vec!["綠茶"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(list.remove_word("綠茶").unwrap());
        assert!(!list.remove_word("綠茶").unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        drop(list);

        let reopened = RedbWordList::open(&path).unwrap();
        assert_eq!(
            reopened.entries().unwrap(),
            vec![UserWord::new("貓熊", Some("zh_CN"))]
        );
    }
}
