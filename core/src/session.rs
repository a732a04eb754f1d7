//! IME session: key handling from keystroke to committed text.
//!
//! `ImeSession` ties one composing editor and its word dictionary to a
//! candidate list and, optionally, a shared phrase dictionary. Keys are
//! offered to handlers in a fixed order: enter, space, delete, candidate
//! navigation, composing, and finally plain character commit.
//!
//! Picking a candidate commits it and replaces the candidates with the
//! characters that commonly follow it.

use std::sync::Arc;

use tracing::trace;

use crate::candidates::CandidateList;
use crate::context::{FieldType, InputConnection};
use crate::editor::{ComposeRule, ComposingEditor, KeyCode};
use crate::phrase::PhraseDictionary;

/// Resolves a composing buffer to candidate characters.
pub trait WordDictionary {
    /// Candidates for `input`, in display order. Empty when nothing matches.
    fn words(&self, input: &str) -> String;
}

/// Session state for one input scheme.
pub struct ImeSession<R, D> {
    editor: ComposingEditor<R>,
    dictionary: D,
    phrases: Option<Arc<PhraseDictionary>>,
    candidates: CandidateList,
    candidates_shown: bool,
}

impl<R: ComposeRule, D: WordDictionary> ImeSession<R, D> {
    pub fn new(rule: R, dictionary: D) -> Self {
        Self {
            editor: ComposingEditor::new(rule),
            dictionary,
            phrases: None,
            candidates: CandidateList::new(),
            candidates_shown: false,
        }
    }

    /// Suggest following words from `phrases` after each pick.
    pub fn with_phrases(mut self, phrases: Arc<PhraseDictionary>) -> Self {
        self.phrases = Some(phrases);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.candidates = CandidateList::with_page_size(page_size);
        self
    }

    pub fn editor(&self) -> &ComposingEditor<R> {
        &self.editor
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Whether the candidate area is visible: there are candidates or
    /// composing text.
    pub fn candidates_shown(&self) -> bool {
        self.candidates_shown
    }

    pub fn composing_text(&self) -> &str {
        self.editor.composing_text()
    }

    /// Begin editing a field of type `field`.
    pub fn start(&mut self, field: FieldType) {
        self.editor.start(field);
        self.candidates.clear();
        self.candidates_shown = false;
    }

    /// Finish editing; drops any composing text.
    pub fn finish(&mut self, ic: &mut dyn InputConnection) {
        self.editor.clear_composing_text(ic);
    }

    /// Change the rule or dictionary settings, then escape.
    pub fn reconfigure<F>(&mut self, ic: &mut dyn InputConnection, f: F)
    where
        F: FnOnce(&mut R, &mut D),
    {
        f(self.editor.rule_mut(), &mut self.dictionary);
        self.escape(ic);
    }

    /// Clear composing text and candidates.
    pub fn escape(&mut self, ic: &mut dyn InputConnection) {
        self.editor.clear_composing_text(ic);
        self.set_candidates("", false);
    }

    /// Process one key. Returns `false` if the host should handle it.
    pub fn on_key(&mut self, key: KeyCode, ic: &mut dyn InputConnection) -> bool {
        trace!(?key, composing = self.editor.composing_text(), "key");
        match key {
            KeyCode::Enter => {
                if self.candidates_shown {
                    self.escape(ic);
                } else if self.editor.treat_enter_as_line_break() {
                    self.commit_text("\n", ic);
                } else {
                    return false;
                }
                return true;
            }
            KeyCode::Space => {
                if self.candidates_shown {
                    if !self.pick_highlighted(ic) && !self.editor.has_composing_text() {
                        self.escape(ic);
                    }
                } else {
                    self.commit_text(" ", ic);
                }
                return true;
            }
            KeyCode::Delete if !self.editor.has_composing_text() => {
                if !self.candidates_shown {
                    return false;
                }
                self.escape(ic);
                return true;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Center => {
                if !self.candidates_shown {
                    return false;
                }
                match key {
                    KeyCode::Left => self.candidates.highlight_left(),
                    KeyCode::Right => self.candidates.highlight_right(),
                    KeyCode::Up => {
                        self.candidates.page_up();
                    }
                    KeyCode::Down => {
                        self.candidates.page_down();
                    }
                    _ => {
                        self.pick_highlighted(ic);
                    }
                }
                return true;
            }
            KeyCode::ModeChange => {
                self.escape(ic);
                return true;
            }
            _ => {}
        }

        if self.editor.compose(key, ic) {
            let words = self.dictionary.words(self.editor.composing_text());
            self.set_candidates(&words, true);
            return true;
        }

        match key.as_char() {
            Some(c) => {
                self.commit_text(c.encode_utf8(&mut [0; 4]), ic);
                true
            }
            None => false,
        }
    }

    /// Commit `text` directly (e.g. a key that types a whole string).
    pub fn commit_text(&mut self, text: &str, ic: &mut dyn InputConnection) {
        self.editor.commit_text(text, ic);
        self.set_candidates("", false);
    }

    /// Commit `candidate` and show its following words.
    pub fn pick_candidate(&mut self, candidate: char, ic: &mut dyn InputConnection) {
        self.commit_text(candidate.encode_utf8(&mut [0; 4]), ic);
        let following = self
            .phrases
            .as_ref()
            .map(|p| p.following_words(candidate))
            .unwrap_or_default();
        self.set_candidates(&following, false);
    }

    /// Pick the highlighted candidate. Returns `false` if nothing is
    /// highlighted.
    pub fn pick_highlighted(&mut self, ic: &mut dyn InputConnection) -> bool {
        match self.candidates.selected_candidate() {
            Some(c) => {
                self.pick_candidate(c, ic);
                true
            }
            None => false,
        }
    }

    fn set_candidates(&mut self, words: &str, highlight_default: bool) {
        self.candidates_shown = !words.is_empty() || self.editor.has_composing_text();
        self.candidates.set_candidates(words, highlight_default);
    }
}

impl<R: std::fmt::Debug, D> std::fmt::Debug for ImeSession<R, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImeSession")
            .field("editor", &self.editor)
            .field("candidates", &self.candidates)
            .field("candidates_shown", &self.candidates_shown)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ImeContext;
    use crate::input_buffer::ComposingBuffer;
    use crate::phrase::PhraseTableBuilder;
    use crate::store::DictionaryStore;

    /// Digits compose; "1" looks up 一 and 七, "12" looks up 十.
    #[derive(Debug)]
    struct Digits;

    impl ComposeRule for Digits {
        fn compose(&mut self, buffer: &mut ComposingBuffer, key: char) -> bool {
            if !key.is_ascii_digit() {
                return false;
            }
            if buffer.len() < 2 {
                buffer.push(key);
            }
            true
        }
    }

    struct Table;

    impl WordDictionary for Table {
        fn words(&self, input: &str) -> String {
            match input {
                "1" => "一七".into(),
                "12" => "十".into(),
                _ => String::new(),
            }
        }
    }

    fn session() -> ImeSession<Digits, Table> {
        let mut builder = PhraseTableBuilder::new();
        builder.add_phrase("一個").add_phrase("一些").add_phrase("十分");
        let phrases = PhraseDictionary::new(DictionaryStore::from_table(builder.build()));
        let mut session = ImeSession::new(Digits, Table).with_phrases(Arc::new(phrases));
        session.start(FieldType::Text);
        session
    }

    #[test]
    fn compose_and_space_picks_first() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        assert!(s.on_key(KeyCode::Char('1'), &mut ctx));
        assert_eq!(s.candidates().candidates(), &['一', '七']);
        assert_eq!(s.candidates().selected_candidate(), Some('一'));

        assert!(s.on_key(KeyCode::Space, &mut ctx));
        assert_eq!(ctx.take_commit(), "一");
        assert!(!s.editor().has_composing_text());
        // Following words, nothing highlighted.
        assert_eq!(s.candidates().candidates(), &['個', '些']);
        assert_eq!(s.candidates().selected_candidate(), None);
        assert!(s.candidates_shown());

        // Space with no highlight and no composing text escapes.
        assert!(s.on_key(KeyCode::Space, &mut ctx));
        assert!(!s.candidates_shown());
        assert!(s.candidates().is_empty());
        assert_eq!(ctx.take_commit(), "");
    }

    #[test]
    fn navigation_then_center_picks() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        s.on_key(KeyCode::Char('1'), &mut ctx);
        assert!(s.on_key(KeyCode::Right, &mut ctx));
        assert!(s.on_key(KeyCode::Center, &mut ctx));
        assert_eq!(ctx.take_commit(), "七");
        assert!(!s.candidates_shown());
    }

    #[test]
    fn unmatched_composing_keeps_candidate_area() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        s.on_key(KeyCode::Char('9'), &mut ctx);
        assert!(s.candidates().is_empty());
        assert!(s.candidates_shown());

        // Enter while shown escapes.
        assert!(s.on_key(KeyCode::Enter, &mut ctx));
        assert_eq!(s.composing_text(), "");
        assert!(!s.candidates_shown());
        assert_eq!(ctx.preedit_text, "");
    }

    #[test]
    fn enter_and_delete_pass_through_when_idle() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        assert!(!s.on_key(KeyCode::Enter, &mut ctx));
        assert!(!s.on_key(KeyCode::Delete, &mut ctx));
        assert!(!s.on_key(KeyCode::Left, &mut ctx));

        s.start(FieldType::ShortMessage);
        assert!(s.on_key(KeyCode::Enter, &mut ctx));
        assert_eq!(ctx.take_commit(), "\n");
    }

    #[test]
    fn delete_edits_then_escapes() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        s.on_key(KeyCode::Char('1'), &mut ctx);
        s.on_key(KeyCode::Char('2'), &mut ctx);
        assert_eq!(s.candidates().candidates(), &['十']);

        assert!(s.on_key(KeyCode::Delete, &mut ctx));
        assert_eq!(s.composing_text(), "1");
        assert_eq!(s.candidates().candidates(), &['一', '七']);

        assert!(s.on_key(KeyCode::Delete, &mut ctx));
        assert_eq!(s.composing_text(), "");
        assert!(s.candidates().is_empty());
        assert!(!s.candidates_shown());
        assert!(!s.on_key(KeyCode::Delete, &mut ctx));
    }

    #[test]
    fn other_keys_commit_verbatim() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        assert!(s.on_key(KeyCode::Char('，'), &mut ctx));
        assert!(s.on_key(KeyCode::Space, &mut ctx));
        assert_eq!(ctx.take_commit(), "， ");
    }

    #[test]
    fn number_field_commits_digits() {
        let mut s = session();
        let mut ctx = ImeContext::new();
        s.start(FieldType::Number);
        assert!(s.on_key(KeyCode::Char('1'), &mut ctx));
        assert_eq!(ctx.take_commit(), "1");
        assert!(s.candidates().is_empty());
    }
}
