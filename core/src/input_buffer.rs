//! Composing buffer for in-progress input.
//!
//! Holds the raw scheme letters typed so far (e.g. "人大口" or "ㄇㄠˊ"). The
//! buffer is always edited at its ends, so there is no cursor; lengths are
//! counted in characters, not bytes.

/// The not-yet-committed keystroke sequence of one editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposingBuffer {
    text: String,
}

impl ComposingBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the composing text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn first(&self) -> Option<char> {
        self.text.chars().next()
    }

    pub fn last(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }

    /// Append a character.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove and return the last character.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Insert a character before the first one.
    pub fn push_front(&mut self, ch: char) {
        self.text.insert(0, ch);
    }

    /// Replace the first character. Returns false if the buffer is empty.
    pub fn replace_first(&mut self, ch: char) -> bool {
        let Some(old) = self.first() else {
            return false;
        };
        self.text.replace_range(..old.len_utf8(), ch.encode_utf8(&mut [0; 4]));
        true
    }

    /// Replace the last character. Returns false if the buffer is empty.
    pub fn replace_last(&mut self, ch: char) -> bool {
        if self.text.pop().is_none() {
            return false;
        }
        self.text.push(ch);
        true
    }

    /// Replace the whole buffer with `chars`.
    pub fn set<I: IntoIterator<Item = char>>(&mut self, chars: I) {
        self.text.clear();
        self.text.extend(chars);
    }
}
