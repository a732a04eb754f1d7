//! Plain-text table sources.
//!
//! One entry per line; blank lines and lines starting with `#` are ignored.
//! Word tables use `<code> <characters>`, where the code is written either
//! in the scheme's own symbols or as the QWERTY keys that type them. Phrase
//! sources hold one multi-character word per line.

use libcangjie::{CangjieTable, CangjieTableBuilder};
use libzhuyin::{ZhuyinTable, ZhuyinTableBuilder};
use tcime_core::{PhraseTable, PhraseTableBuilder};
use tracing::warn;

/// Counts from one source file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    pub entries: usize,
    pub skipped: usize,
}

impl SourceStats {
    fn record(&mut self, line_no: usize, line: &str, added: bool) {
        if added {
            self.entries += 1;
        } else {
            self.skipped += 1;
            warn!(line = line_no, text = line, "skipping malformed entry");
        }
    }
}

/// Non-comment lines with their 1-based line numbers.
fn entries(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let entry = (parts.next()?, parts.next()?);
    parts.next().is_none().then_some(entry)
}

pub fn parse_cangjie(text: &str) -> (CangjieTable, SourceStats) {
    let mut builder = CangjieTableBuilder::new();
    let mut stats = SourceStats::default();
    for (line_no, line) in entries(text) {
        let added = split_entry(line).is_some_and(|(code, words)| {
            if code.is_ascii() {
                builder.add_words(&libcangjie::keymap::translate(code), words)
            } else {
                builder.add_words(code, words)
            }
        });
        stats.record(line_no, line, added);
    }
    (builder.build(), stats)
}

pub fn parse_zhuyin(text: &str) -> (ZhuyinTable, SourceStats) {
    let mut builder = ZhuyinTableBuilder::new();
    let mut stats = SourceStats::default();
    for (line_no, line) in entries(text) {
        let added = split_entry(line).is_some_and(|(syllable, words)| {
            if syllable.is_ascii() {
                builder.add_words(&libzhuyin::keymap::translate(syllable), words)
            } else {
                builder.add_words(syllable, words)
            }
        });
        stats.record(line_no, line, added);
    }
    (builder.build(), stats)
}

pub fn parse_phrases(text: &str) -> (PhraseTable, SourceStats) {
    let mut builder = PhraseTableBuilder::new();
    let mut stats = SourceStats::default();
    for (line_no, line) in entries(text) {
        let added = !line.contains(char::is_whitespace) && line.chars().nth(1).is_some();
        if added {
            builder.add_phrase(line);
        }
        stats.record(line_no, line, added);
    }
    (builder.build(), stats)
}
