//! # libcangjie
//!
//! Cangjie (shape-based) input method built on tcime-core.

pub mod dictionary;
pub mod editor;
pub mod keymap;
pub mod table;

use tcime_core::{DictionaryStore, ImeConfig, ImeSession, InputConnection};
use tracing::debug;

pub use dictionary::{CangjieDictionary, CangjieTable, CangjieTableBuilder, CodeRun};
pub use editor::{CangjieEditor, CangjieRule};
pub use table::{is_letter, primary_index, secondary_index};

/// A session typing Cangjie.
pub type CangjieSession = ImeSession<CangjieRule, CangjieDictionary>;

/// Create a Cangjie session over `dictionary`.
pub fn create_session(mut dictionary: CangjieDictionary, simplified: bool) -> CangjieSession {
    dictionary.set_simplified(simplified);
    ImeSession::new(CangjieRule::new(simplified), dictionary)
}

/// Create a Cangjie session from configuration.
///
/// The table named by `config.cangjie_table` starts loading in the
/// background; without one every lookup is empty.
pub fn session_from_config(config: &ImeConfig) -> CangjieSession {
    let dictionary = match &config.cangjie_table {
        Some(path) => CangjieDictionary::open(path),
        None => CangjieDictionary::new(DictionaryStore::absent()),
    };
    create_session(dictionary, config.cangjie_simplified).with_page_size(config.candidate_page_size)
}

/// Switching between full and simplified Cangjie.
pub trait SimplifiedMode {
    fn is_simplified(&self) -> bool;

    /// Change mode on both the editor and the dictionary, dropping any
    /// composing text and candidates.
    fn set_simplified(&mut self, simplified: bool, ic: &mut dyn InputConnection);
}

impl SimplifiedMode for CangjieSession {
    fn is_simplified(&self) -> bool {
        self.dictionary().is_simplified()
    }

    fn set_simplified(&mut self, simplified: bool, ic: &mut dyn InputConnection) {
        debug!(simplified, "switching cangjie mode");
        self.reconfigure(ic, |rule, dictionary| {
            rule.simplified = simplified;
            dictionary.set_simplified(simplified);
        });
    }
}
