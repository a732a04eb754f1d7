//! Host-side view of an input session.
//!
//! The editor talks to the host text field through [`InputConnection`]. Hosts
//! that don't want to implement it can use [`ImeContext`], a plain data
//! container the platform reads after every key: the composing text to show
//! underlined, and the text committed since it was last taken.

/// Kind of text field the session is editing, reported by the host at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Free-form text (default)
    #[default]
    Text,
    /// Short message; Enter inserts a line break instead of sending
    ShortMessage,
    /// Number input (composing disabled)
    Number,
    /// Date or time input (composing disabled)
    DateTime,
    /// Phone number (composing disabled)
    Phone,
    /// Anything else the host doesn't classify
    Other,
}

impl FieldType {
    /// Whether keys may start composing in this field.
    pub fn allows_composing(self) -> bool {
        !matches!(self, FieldType::Number | FieldType::DateTime | FieldType::Phone)
    }

    /// Whether Enter should commit a line break.
    pub fn enter_is_line_break(self) -> bool {
        self == FieldType::ShortMessage
    }
}

/// The host text field as seen by an editor.
pub trait InputConnection {
    /// Replace the composing (underlined, uncommitted) region.
    fn set_composing_text(&mut self, text: &str);

    /// Commit `text`, replacing the composing region.
    fn commit_text(&mut self, text: &str);

    fn begin_batch_edit(&mut self) {}

    fn end_batch_edit(&mut self) {}
}

/// Plain data implementation of [`InputConnection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImeContext {
    /// Text being composed
    pub preedit_text: String,

    /// Text committed to the application and not yet taken
    pub commit_text: String,

    /// Number of composing-text updates received
    pub preedit_updates: usize,
}

impl ImeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the commit text, leaving it empty.
    pub fn take_commit(&mut self) -> String {
        std::mem::take(&mut self.commit_text)
    }

    pub fn has_commit(&self) -> bool {
        !self.commit_text.is_empty()
    }
}

impl InputConnection for ImeContext {
    fn set_composing_text(&mut self, text: &str) {
        self.preedit_text.clear();
        self.preedit_text.push_str(text);
        self.preedit_updates += 1;
    }

    fn commit_text(&mut self, text: &str) {
        self.preedit_text.clear();
        self.commit_text.push_str(text);
    }
}
