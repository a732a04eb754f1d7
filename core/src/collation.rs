//! Traditional Chinese collation.
//!
//! Characters are ordered the way Traditional Chinese dictionaries order them:
//! by total stroke count, then by radical. Big5 splits its hanzi into two
//! levels, frequent (A440-C67E) and less frequent (C940-F9D5), and orders each
//! level by strokes and then radical on its own. The stroke count is recovered
//! from the group a code falls into, so both levels interleave by strokes;
//! within a stroke count, level-one characters come first.
//!
//! Big5 symbols sort before hanzi, other Big5 codes after them, and characters
//! Big5 cannot encode after everything else, by code point.

use std::cmp::Ordering;

use encoding_rs::BIG5;

/// First Big5 code of each stroke-count group, level one.
const LEVEL_ONE_STROKES: &[(u16, u8)] = &[
    (0xA440, 1), (0xA442, 2), (0xA454, 3), (0xA4A1, 4), (0xA4FE, 5), (0xA5E0, 6),
    (0xA6EA, 7), (0xA8C3, 8), (0xAB46, 9), (0xADBC, 10), (0xB0AE, 11), (0xB3C3, 12),
    (0xB6C3, 13), (0xB9AC, 14), (0xBBF5, 15), (0xBEA7, 16), (0xC075, 17), (0xC24F, 18),
    (0xC35F, 19), (0xC457, 20), (0xC4D7, 21), (0xC56B, 22), (0xC5C8, 23), (0xC5F1, 24),
    (0xC655, 25), (0xC665, 26), (0xC66C, 27), (0xC676, 28), (0xC679, 29), (0xC67D, 30),
    (0xC67E, 32),
];

/// First Big5 code of each stroke-count group, level two.
const LEVEL_TWO_STROKES: &[(u16, u8)] = &[
    (0xC940, 2), (0xC945, 3), (0xC94D, 4), (0xC963, 5), (0xC9AB, 6), (0xCA5A, 7),
    (0xCBB1, 8), (0xCDDD, 9), (0xD0C8, 10), (0xD44B, 11), (0xD851, 12), (0xDCB1, 13),
    (0xE0F0, 14), (0xE4E6, 15), (0xE8F4, 16), (0xECB9, 17), (0xEFB7, 18), (0xF1EB, 19),
    (0xF3FD, 20), (0xF5C0, 21), (0xF6D6, 22), (0xF7D0, 23), (0xF8A5, 24), (0xF8EE, 25),
    (0xF96B, 26), (0xF9A2, 27), (0xF9BA, 28), (0xF9C7, 29), (0xF9CC, 30), (0xF9D0, 31),
    (0xF9D1, 32), (0xF9D2, 33), (0xF9D3, 35), (0xF9D4, 36), (0xF9D5, 48),
];

const LEVEL_ONE_END: u16 = 0xC67E;
const LEVEL_TWO_END: u16 = 0xF9D5;

/// Collation key of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CollationKey {
    /// ASCII and Big5 symbols, by code.
    Symbol(u16),
    /// Big5 hanzi: stroke count, then level, then code.
    Hanzi { strokes: u8, level: u8, code: u16 },
    /// Big5 codes outside both hanzi levels.
    Other(u16),
    /// Not encodable in Big5; ordered by scalar value.
    Unmapped(u32),
}

fn strokes_in(groups: &[(u16, u8)], code: u16) -> u8 {
    let at = groups.partition_point(|&(start, _)| start <= code);
    groups[at.saturating_sub(1)].1
}

/// Stroke count of a Big5 hanzi code, or `None` outside both levels.
pub fn big5_strokes(code: u16) -> Option<u8> {
    match code {
        0xA440..=LEVEL_ONE_END => Some(strokes_in(LEVEL_ONE_STROKES, code)),
        0xC940..=LEVEL_TWO_END => Some(strokes_in(LEVEL_TWO_STROKES, code)),
        _ => None,
    }
}

fn big5_code(c: char) -> Option<u16> {
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = BIG5.encode(c.encode_utf8(&mut buf));
    match (had_errors, bytes.as_ref()) {
        (false, [lead, trail]) => Some(u16::from_be_bytes([*lead, *trail])),
        (false, [single]) => Some(u16::from(*single)),
        _ => None,
    }
}

/// Compute the collation key for `c`.
pub fn collation_key(c: char) -> CollationKey {
    let Some(code) = big5_code(c) else {
        return CollationKey::Unmapped(c as u32);
    };
    match big5_strokes(code) {
        Some(strokes) => CollationKey::Hanzi {
            strokes,
            level: if code <= LEVEL_ONE_END { 1 } else { 2 },
            code,
        },
        None if code < 0xA440 => CollationKey::Symbol(code),
        None => CollationKey::Other(code),
    }
}

/// Compare two characters in Traditional Chinese order.
pub fn compare(a: char, b: char) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Sort characters in Traditional Chinese order. The sort is stable, so
/// characters with equal keys keep their relative order.
pub fn sort_chars(chars: &mut [char]) {
    chars.sort_by_cached_key(|&c| collation_key(c));
}
