//! Error types for table loading and user dictionary access.
//!
//! Neither error ever reaches a lookup caller: the loader logs a `StoreError`
//! and leaves the table absent, and the phrase dictionary logs a
//! `UserDictError` and keeps its previous override table.

use thiserror::Error;

/// Failure to load or validate a packed dictionary table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("couldn't read the dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't decode the dictionary file: {0}")]
    Decode(#[from] bincode::Error),

    #[error("bad table magic {found:?}, expected {expected:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported table version {found} (this build reads version {supported})")]
    UnsupportedVersion { supported: u32, found: u32 },

    #[error("corrupt table: {0}")]
    Corrupt(String),
}

/// Failure to query or update a user dictionary source.
#[derive(Debug, Error)]
pub enum UserDictError {
    #[error("user dictionary storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("user dictionary is unavailable: {0}")]
    Unavailable(String),
}

impl From<redb::TransactionError> for UserDictError {
    fn from(e: redb::TransactionError) -> Self {
        UserDictError::Storage(e.into())
    }
}

impl From<redb::TableError> for UserDictError {
    fn from(e: redb::TableError) -> Self {
        UserDictError::Storage(e.into())
    }
}

impl From<redb::StorageError> for UserDictError {
    fn from(e: redb::StorageError) -> Self {
        UserDictError::Storage(e.into())
    }
}

impl From<redb::CommitError> for UserDictError {
    fn from(e: redb::CommitError) -> Self {
        UserDictError::Storage(e.into())
    }
}

impl From<redb::DatabaseError> for UserDictError {
    fn from(e: redb::DatabaseError) -> Self {
        UserDictError::Storage(e.into())
    }
}

/// Failure to read or write an [`ImeConfig`](crate::config::ImeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't access the config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("couldn't serialize the config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
