//! tcime-core
//!
//! Scheme-independent parts of the Traditional Chinese input method engine,
//! shared by the Cangjie (`libcangjie`) and Zhuyin (`libzhuyin`) crates.
//!
//! Public API:
//! - `DictionaryStore` / `PackedTable` - versioned packed tables loaded once
//!   in the background
//! - `PhraseDictionary` - follow-word suggestions, personalized from a
//!   `UserDictionarySource`
//! - `ComposingEditor` / `ComposeRule` - the composing state machine
//! - `ImeSession` / `WordDictionary` - key handling from keystroke to commit
//! - `ImeConfig` - configuration
//! - `collation` - Traditional Chinese character order

pub mod candidates;
pub mod collation;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod input_buffer;
pub mod phrase;
pub mod session;
pub mod store;
pub mod userdict;

pub use candidates::{CandidateList, DEFAULT_PAGE_SIZE};
pub use config::ImeConfig;
pub use context::{FieldType, ImeContext, InputConnection};
pub use editor::{ComposeRule, ComposingEditor, KeyCode};
pub use error::{ConfigError, StoreError, UserDictError};
pub use input_buffer::ComposingBuffer;
pub use phrase::{OverrideTable, PhraseDictionary, PhraseTable, PhraseTableBuilder};
pub use session::{ImeSession, WordDictionary};
pub use store::{
    load_table, read_table, save_table, table_to_bytes, write_table, DictionaryStore, PackedTable,
    TABLE_VERSION,
};
pub use userdict::{
    ChangeCallback, ChangeNotifier, InMemoryWordList, RedbWordList, SubscriptionId,
    UserDictionarySource, UserWord,
};
