//! Composing editor shared by both input schemes.
//!
//! An editor owns one [`ComposingBuffer`] and moves between two states:
//! empty and composing. Delete keys are handled here; every other key is
//! handed to a scheme-specific [`ComposeRule`] that decides whether the key
//! belongs to the scheme and how it reshapes the buffer.

use crate::context::{FieldType, InputConnection};
use crate::input_buffer::ComposingBuffer;

/// Key codes delivered by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key (scheme letter, tone mark, punctuation, ...)
    Char(char),
    /// Backspace
    Delete,
    /// Enter/Return
    Enter,
    /// Space bar
    Space,
    /// Keyboard mode switch (handled by the host)
    ModeChange,
    /// Move candidate highlight left
    Left,
    /// Move candidate highlight right
    Right,
    /// Previous candidate page
    Up,
    /// Next candidate page
    Down,
    /// Pick the highlighted candidate
    Center,
}

impl KeyCode {
    /// The character this key would type if nothing else consumed it.
    pub fn as_char(self) -> Option<char> {
        match self {
            KeyCode::Char(c) => Some(c),
            KeyCode::Space => Some(' '),
            KeyCode::Enter => Some('\n'),
            _ => None,
        }
    }
}

/// Scheme grammar applied to every non-delete key.
pub trait ComposeRule {
    /// Try to apply `key` to `buffer`.
    ///
    /// Returns `true` if the key was consumed, whether or not the buffer
    /// changed. A rejected key must leave the buffer untouched.
    fn compose(&mut self, buffer: &mut ComposingBuffer, key: char) -> bool;
}

/// Composing state machine parameterized by the scheme rule.
#[derive(Debug, Clone)]
pub struct ComposingEditor<R> {
    buffer: ComposingBuffer,
    rule: R,
    can_compose: bool,
    enter_as_line_break: bool,
}

impl<R: ComposeRule> ComposingEditor<R> {
    pub fn new(rule: R) -> Self {
        Self {
            buffer: ComposingBuffer::new(),
            rule,
            can_compose: true,
            enter_as_line_break: false,
        }
    }

    /// Reset to empty and take the composing policy from `field`.
    pub fn start(&mut self, field: FieldType) {
        self.buffer.clear();
        self.can_compose = field.allows_composing();
        self.enter_as_line_break = field.enter_is_line_break();
    }

    pub fn composing_text(&self) -> &str {
        self.buffer.text()
    }

    pub fn has_composing_text(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn can_compose(&self) -> bool {
        self.can_compose
    }

    pub fn treat_enter_as_line_break(&self) -> bool {
        self.enter_as_line_break
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn rule_mut(&mut self) -> &mut R {
        &mut self.rule
    }

    /// Clear the buffer, telling the host only if there was anything to clear.
    pub fn clear_composing_text(&mut self, ic: &mut dyn InputConnection) {
        if self.has_composing_text() {
            self.buffer.clear();
            ic.set_composing_text("");
        }
    }

    /// Feed one key. Returns `true` if the key was consumed.
    pub fn compose(&mut self, key: KeyCode, ic: &mut dyn InputConnection) -> bool {
        match key {
            KeyCode::Delete => {
                if self.buffer.pop().is_none() {
                    return false;
                }
            }
            KeyCode::Char(c) => {
                if !self.can_compose || !self.rule.compose(&mut self.buffer, c) {
                    return false;
                }
            }
            _ => return false,
        }
        ic.set_composing_text(self.buffer.text());
        true
    }

    /// Commit `text` to the host and clear the buffer.
    pub fn commit_text(&mut self, text: &str, ic: &mut dyn InputConnection) {
        if text.chars().nth(1).is_some() {
            ic.begin_batch_edit();
            ic.commit_text(text);
            ic.end_batch_edit();
        } else {
            ic.commit_text(text);
        }
        self.buffer.clear();
    }
}
