//! # libzhuyin
//!
//! Zhuyin/Bopomofo input method built on tcime-core.

pub mod dictionary;
pub mod editor;
pub mod keymap;
pub mod table;

use tcime_core::{DictionaryStore, ImeConfig, ImeSession};

pub use dictionary::{ToneRun, ZhuyinDictionary, ZhuyinTable, ZhuyinTableBuilder};
pub use editor::{ZhuyinEditor, ZhuyinRule};
pub use table::{finals_index, initials_index, strip_tone, syllables_index, tone_index};

/// A session typing Zhuyin.
pub type ZhuyinSession = ImeSession<ZhuyinRule, ZhuyinDictionary>;

/// Create a Zhuyin session over `dictionary`.
pub fn create_session(dictionary: ZhuyinDictionary) -> ZhuyinSession {
    ImeSession::new(ZhuyinRule, dictionary)
}

/// Create a Zhuyin session from configuration.
///
/// The table named by `config.zhuyin_table` starts loading in the
/// background; without one every lookup is empty.
pub fn session_from_config(config: &ImeConfig) -> ZhuyinSession {
    let dictionary = match &config.zhuyin_table {
        Some(path) => ZhuyinDictionary::open(path),
        None => ZhuyinDictionary::new(DictionaryStore::absent()),
    };
    create_session(dictionary).with_page_size(config.candidate_page_size)
}
