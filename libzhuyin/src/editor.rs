//! Zhuyin composing rule.
//!
//! The composing text is one syllable: an initial, a ㄧ/ㄨ/ㄩ medial, another
//! final and a tone mark, each optional, always in that order. Typing a
//! final replaces whichever final of its kind is already there, so the
//! finals can be typed in any order and corrected in place.

use tcime_core::{ComposeRule, ComposingBuffer, ComposingEditor};

use crate::table::{finals_index, is_initial, is_tone, is_yi_wu_yu, strip_tone, DEFAULT_TONE};

/// A syllable split into its slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Slots {
    initial: Option<char>,
    medial: Option<char>,
    rhyme: Option<char>,
    tone: Option<char>,
}

impl Slots {
    fn decompose(text: &str) -> Self {
        let mut slots = Slots::default();
        let Some((syllables, tone)) = strip_tone(text) else {
            return slots;
        };
        if tone != DEFAULT_TONE {
            slots.tone = Some(tone);
        }
        let mut chars = syllables.chars().peekable();
        if let Some(&c) = chars.peek() {
            if is_initial(c) {
                slots.initial = Some(c);
                chars.next();
            }
        }
        match chars.next() {
            Some(c) if is_yi_wu_yu(c) => {
                slots.medial = Some(c);
                slots.rhyme = chars.next();
            }
            other => slots.rhyme = other,
        }
        slots
    }

    /// Present slots in composing order.
    fn chars(self) -> impl Iterator<Item = char> {
        [self.initial, self.medial, self.rhyme, self.tone]
            .into_iter()
            .flatten()
    }
}

fn is_final(c: char) -> bool {
    matches!(finals_index(c.encode_utf8(&mut [0; 4])), Some(i) if i > 0)
}

/// Zhuyin syllable grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZhuyinRule;

impl ComposeRule for ZhuyinRule {
    fn compose(&mut self, buffer: &mut ComposingBuffer, key: char) -> bool {
        if is_tone(key) {
            // Tones need a syllable to attach to.
            let Some((_, tone)) = strip_tone(buffer.text()) else {
                return false;
            };
            if key == DEFAULT_TONE {
                if tone != DEFAULT_TONE {
                    buffer.pop();
                }
            } else if tone == DEFAULT_TONE {
                buffer.push(key);
            } else {
                buffer.replace_last(key);
            }
        } else if is_initial(key) {
            if buffer.first().is_some_and(is_initial) {
                buffer.replace_first(key);
            } else {
                buffer.push_front(key);
            }
        } else if is_final(key) {
            let mut slots = Slots::decompose(buffer.text());
            if is_yi_wu_yu(key) {
                slots.medial = Some(key);
            } else {
                slots.rhyme = Some(key);
            }
            buffer.set(slots.chars());
        } else {
            return false;
        }
        true
    }
}

pub type ZhuyinEditor = ComposingEditor<ZhuyinRule>;
