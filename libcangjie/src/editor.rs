//! Cangjie composing rule.

use tcime_core::{ComposeRule, ComposingBuffer, ComposingEditor};

use crate::table::{is_letter, MAX_CODE_LENGTH, MAX_SIMPLIFIED_CODE_LENGTH};

/// Accepts Cangjie letters up to the active code length.
///
/// A letter typed into a full buffer is consumed without changing it, so it
/// doesn't leak into the text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CangjieRule {
    pub simplified: bool,
}

impl CangjieRule {
    pub fn new(simplified: bool) -> Self {
        Self { simplified }
    }

    pub fn max_code_length(&self) -> usize {
        if self.simplified {
            MAX_SIMPLIFIED_CODE_LENGTH
        } else {
            MAX_CODE_LENGTH
        }
    }
}

impl ComposeRule for CangjieRule {
    fn compose(&mut self, buffer: &mut ComposingBuffer, key: char) -> bool {
        if !is_letter(key) {
            return false;
        }
        if buffer.len() < self.max_code_length() {
            buffer.push(key);
        }
        true
    }
}

pub type CangjieEditor = ComposingEditor<CangjieRule>;
