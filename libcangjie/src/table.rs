//! Cangjie code table.
//!
//! A Cangjie code is one to five of the 25 radical letters. Each letter has a
//! 1-based index; a code maps to two numbers:
//!
//! - the primary index, from the first and last letters, selecting a row of
//!   the word table (`(first - 1) * 26 + last`, with `last = 0` for a
//!   one-letter code), and
//! - the secondary index, from the middle letters read as base-26 digits and
//!   padded to three digits, ordering candidates inside that row.

use phf::phf_map;

/// Maximum letters in a full code.
pub const MAX_CODE_LENGTH: usize = 5;

/// Maximum letters in a simplified (first + last) code.
pub const MAX_SIMPLIFIED_CODE_LENGTH: usize = 2;

/// The radix of code arithmetic: every letter plus "absent" (0).
pub const BASE: usize = LETTERS.len() + 1;

/// Rows in the word table.
pub const PRIMARY_INDEX_COUNT: usize = LETTERS.len() * BASE;

/// The letters in index order, starting at 1.
pub const LETTERS: [char; 25] = [
    '日', '月', '金', '木', '水', '火', '土', '竹', '戈', '十', '大', '中', '一', '弓', '人', '心',
    '手', '口', '尸', '廿', '山', '女', '田', '難', '卜',
];

static LETTER_INDEX: phf::Map<char, usize> = phf_map! {
    '日' => 1, '月' => 2, '金' => 3, '木' => 4, '水' => 5,
    '火' => 6, '土' => 7, '竹' => 8, '戈' => 9, '十' => 10,
    '大' => 11, '中' => 12, '一' => 13, '弓' => 14, '人' => 15,
    '心' => 16, '手' => 17, '口' => 18, '尸' => 19, '廿' => 20,
    '山' => 21, '女' => 22, '田' => 23, '難' => 24, '卜' => 25,
};

/// 1-based index of a Cangjie letter.
pub fn letter_index(c: char) -> Option<usize> {
    LETTER_INDEX.get(&c).copied()
}

pub fn is_letter(c: char) -> bool {
    LETTER_INDEX.contains_key(&c)
}

fn code_chars(code: &str) -> Option<Vec<char>> {
    let chars: Vec<char> = code.chars().collect();
    (1..=MAX_CODE_LENGTH)
        .contains(&chars.len())
        .then_some(chars)
}

/// Row of the word table for `code`, or `None` for an invalid code.
pub fn primary_index(code: &str) -> Option<usize> {
    let chars = code_chars(code)?;
    let first = letter_index(chars[0])?;
    let last = match chars.len() {
        1 => 0,
        n => letter_index(chars[n - 1])?,
    };
    Some((first - 1) * BASE + last)
}

/// Ordering key of `code` within its row, or `None` if a middle character
/// is not a letter.
pub fn secondary_index(code: &str) -> Option<usize> {
    let chars = code_chars(code)?;
    let middle = chars.get(1..chars.len().saturating_sub(1)).unwrap_or(&[]);
    let mut index = 0;
    for &c in middle {
        index = index * BASE + letter_index(c)?;
    }
    for _ in middle.len()..MAX_CODE_LENGTH - 2 {
        index *= BASE;
    }
    Some(index)
}
