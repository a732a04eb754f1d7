//! Packed dictionary tables and their background loader.
//!
//! Every dictionary blob is a small header (`magic`, `version`) followed by a
//! bincode-encoded table. Tables are immutable once decoded and validated, so
//! lookups may read them from any thread without locking.
//!
//! `DictionaryStore` starts decoding on a worker thread as soon as it is
//! constructed. The first lookup blocks until the worker hands the table over
//! through a one-shot channel; every later lookup reads the cached result.
//! A blob that fails to load leaves the store permanently empty and all
//! lookups against it return nothing.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::StoreError;

/// Version of the packed table layout written by this build.
pub const TABLE_VERSION: u32 = 1;

/// Read buffer size; dictionary blobs are typically 64-128 KiB.
const READ_BUFFER_SIZE: usize = 128 * 1024;

/// A table that can be stored in a dictionary blob.
pub trait PackedTable: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Four-byte tag identifying the table kind in the blob header.
    const MAGIC: [u8; 4];

    /// Short name used for logging and the loader thread name.
    const NAME: &'static str;

    /// Check the structural invariants lookups rely on.
    fn validate(&self) -> Result<(), StoreError>;

    /// Number of populated entries, for diagnostics.
    fn entry_count(&self) -> usize;
}

/// Decode and validate a table from a blob.
pub fn read_table<T: PackedTable, R: Read>(source: R) -> Result<T, StoreError> {
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, source);
    let (magic, version): ([u8; 4], u32) = bincode::deserialize_from(&mut reader)?;
    if magic != T::MAGIC {
        return Err(StoreError::BadMagic {
            expected: T::MAGIC,
            found: magic,
        });
    }
    if version != TABLE_VERSION {
        return Err(StoreError::UnsupportedVersion {
            supported: TABLE_VERSION,
            found: version,
        });
    }
    let table: T = bincode::deserialize_from(&mut reader)?;
    table.validate()?;
    Ok(table)
}

/// Encode a table as a blob.
pub fn write_table<T: PackedTable, W: Write>(table: &T, sink: W) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(sink);
    bincode::serialize_into(&mut writer, &(T::MAGIC, TABLE_VERSION))?;
    bincode::serialize_into(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

/// Save a table to a file.
pub fn save_table<T: PackedTable, P: AsRef<Path>>(table: &T, path: P) -> Result<(), StoreError> {
    let file = File::create(path)?;
    write_table(table, file)
}

/// Load a table from a file on the calling thread.
pub fn load_table<T: PackedTable, P: AsRef<Path>>(path: P) -> Result<T, StoreError> {
    let file = File::open(path)?;
    read_table(file)
}

/// Encode a table into an in-memory blob.
pub fn table_to_bytes<T: PackedTable>(table: &T) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    Ok(buf)
}

/// A packed table that is loaded once, in the background, and then shared
/// read-only.
pub struct DictionaryStore<T> {
    table: OnceLock<Option<T>>,
    pending: Mutex<Option<Receiver<Option<T>>>>,
}

impl<T: PackedTable> DictionaryStore<T> {
    /// Start decoding `source` on a worker thread.
    ///
    /// Returns immediately; the first call to [`get`](Self::get) waits for
    /// the worker to finish.
    pub fn spawn<R: Read + Send + 'static>(source: R) -> Self {
        let (done, pending) = mpsc::sync_channel(1);
        let spawned = thread::Builder::new()
            .name(format!("{}-loader", T::NAME))
            .spawn(move || {
                let started = Instant::now();
                let loaded = match read_table::<T, R>(source) {
                    Ok(table) => {
                        info!(
                            table = T::NAME,
                            entries = table.entry_count(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "dictionary loaded"
                        );
                        Some(table)
                    }
                    Err(e) => {
                        error!(table = T::NAME, error = %e, "couldn't load the dictionary");
                        None
                    }
                };
                // The store may already be gone; nobody is waiting then.
                let _ = done.send(loaded);
            });
        if let Err(e) = spawned {
            // The sender died with the closure, so the first lookup sees an
            // empty table instead of blocking forever.
            error!(table = T::NAME, error = %e, "couldn't start the dictionary loader");
        }
        Self {
            table: OnceLock::new(),
            pending: Mutex::new(Some(pending)),
        }
    }

    /// Start loading the blob at `path` in the background.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        debug!(table = T::NAME, path = %path.display(), "opening dictionary");
        match File::open(path) {
            Ok(file) => Self::spawn(file),
            Err(e) => {
                error!(table = T::NAME, path = %path.display(), error = %e, "couldn't open the dictionary");
                Self::absent()
            }
        }
    }

    /// A store that is already loaded with `table`.
    pub fn from_table(table: T) -> Self {
        Self {
            table: OnceLock::from(Some(table)),
            pending: Mutex::new(None),
        }
    }

    /// A store whose table failed to load. Every lookup returns nothing.
    pub fn absent() -> Self {
        Self {
            table: OnceLock::from(None),
            pending: Mutex::new(None),
        }
    }

    /// The loaded table, blocking on the first call until loading finishes.
    ///
    /// Returns `None` if the blob could not be loaded.
    pub fn get(&self) -> Option<&T> {
        self.table
            .get_or_init(|| {
                let pending = self
                    .pending
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .take();
                pending.and_then(|rx| rx.recv().ok()).flatten()
            })
            .as_ref()
    }

    /// Whether loading has finished (successfully or not) and been observed.
    pub fn is_resolved(&self) -> bool {
        self.table.get().is_some()
    }
}

impl<T> std::fmt::Debug for DictionaryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.table.get() {
            None => "loading",
            Some(None) => "absent",
            Some(Some(_)) => "loaded",
        };
        f.debug_struct("DictionaryStore").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Numbers {
        values: Vec<u32>,
    }

    impl PackedTable for Numbers {
        const MAGIC: [u8; 4] = *b"TEST";
        const NAME: &'static str = "numbers";

        fn validate(&self) -> Result<(), StoreError> {
            if self.values.windows(2).all(|w| w[0] <= w[1]) {
                Ok(())
            } else {
                Err(StoreError::Corrupt("values out of order".into()))
            }
        }

        fn entry_count(&self) -> usize {
            self.values.len()
        }
    }

    #[test]
    fn blob_roundtrip() {
        let table = Numbers {
            values: vec![1, 2, 3],
        };
        let bytes = table_to_bytes(&table).unwrap();
        let loaded: Numbers = read_table(Cursor::new(bytes)).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut bytes = table_to_bytes(&Numbers { values: vec![] }).unwrap();
        bytes[0] = b'X';
        let err = read_table::<Numbers, _>(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StoreError::BadMagic { .. }));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut bytes = Vec::new();
        bincode::serialize_into(&mut bytes, &(*b"TEST", TABLE_VERSION + 1)).unwrap();
        bincode::serialize_into(&mut bytes, &Numbers { values: vec![] }).unwrap();
        let err = read_table::<Numbers, _>(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion { found, .. } if found == TABLE_VERSION + 1));
    }

    #[test]
    fn invalid_table_is_rejected() {
        let bytes = table_to_bytes(&Numbers {
            values: vec![3, 1],
        })
        .unwrap();
        let err = read_table::<Numbers, _>(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn background_load_resolves_on_first_get() {
        let bytes = table_to_bytes(&Numbers {
            values: vec![4, 5],
        })
        .unwrap();
        let store: DictionaryStore<Numbers> = DictionaryStore::spawn(Cursor::new(bytes));
        assert_eq!(store.get().map(|t| t.values.clone()), Some(vec![4, 5]));
        assert!(store.is_resolved());
        // Later lookups see the same table.
        assert_eq!(store.get().map(|t| t.values.len()), Some(2));
    }

    #[test]
    fn truncated_blob_leaves_store_empty() {
        let bytes = table_to_bytes(&Numbers {
            values: vec![1, 2, 3],
        })
        .unwrap();
        let store: DictionaryStore<Numbers> =
            DictionaryStore::spawn(Cursor::new(bytes[..bytes.len() - 2].to_vec()));
        assert!(store.get().is_none());
        assert!(store.get().is_none());
    }

    #[test]
    fn missing_file_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: DictionaryStore<Numbers> = DictionaryStore::open(dir.path().join("missing.bin"));
        assert!(store.get().is_none());
    }

    #[test]
    fn save_then_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.bin");
        save_table(&Numbers { values: vec![7] }, &path).unwrap();
        let store: DictionaryStore<Numbers> = DictionaryStore::open(&path);
        assert_eq!(store.get().map(|t| t.values[0]), Some(7));
    }
}
