//! Zhuyin syllable table.
//!
//! Every syllable is an optional initial followed by up to two finals, and
//! maps to one cell of a 22-column (initials) by 39-row (finals) grid, laid
//! out as in <http://en.wikipedia.org/wiki/Zhuyin_table>. A syllable may end
//! with one of four tone marks; no mark means the default tone.

/// Columns of the grid: the 21 initials plus "no initial" (0).
pub const INITIALS_COUNT: usize = 22;

/// Rows of the grid: "no final" (0), 13 simple finals, and the ㄧ/ㄨ/ㄩ groups.
pub const FINALS_COUNT: usize = 39;

/// Cells in the grid.
pub const SYLLABLE_INDEX_COUNT: usize = INITIALS_COUNT * FINALS_COUNT;

/// The default tone, never shown in composing text.
pub const DEFAULT_TONE: char = ' ';

/// Tone marks in index order.
pub const TONES: [char; 5] = [DEFAULT_TONE, '˙', 'ˊ', 'ˇ', 'ˋ'];

pub const TONE_COUNT: usize = TONES.len();

const FIRST_INITIAL: u32 = 'ㄅ' as u32;
const FIRST_FINAL: u32 = 'ㄚ' as u32;

const YI: char = 'ㄧ';
const WU: char = 'ㄨ';
const YU: char = 'ㄩ';

const YI_FINALS_INDEX: usize = 14;
const WU_FINALS_INDEX: usize = 25;
const YU_FINALS_INDEX: usize = 34;

/// Finals that may follow ㄧ.
const YI_ENDINGS: [char; 10] = ['ㄚ', 'ㄛ', 'ㄝ', 'ㄞ', 'ㄠ', 'ㄡ', 'ㄢ', 'ㄣ', 'ㄤ', 'ㄥ'];
/// Finals that may follow ㄨ.
const WU_ENDINGS: [char; 8] = ['ㄚ', 'ㄛ', 'ㄞ', 'ㄟ', 'ㄢ', 'ㄣ', 'ㄤ', 'ㄥ'];
/// Finals that may follow ㄩ.
const YU_ENDINGS: [char; 4] = ['ㄝ', 'ㄢ', 'ㄣ', 'ㄥ'];

/// Column of `c`: 1..=21 for an initial, 0 for a character past the
/// initials (the syllable starts with a final), `None` below ㄅ.
pub fn initials_index(c: char) -> Option<usize> {
    let offset = (c as u32).checked_sub(FIRST_INITIAL)? as usize + 1;
    Some(if offset >= INITIALS_COUNT { 0 } else { offset })
}

/// Whether `c` is one of the 21 initials.
pub fn is_initial(c: char) -> bool {
    matches!(initials_index(c), Some(i) if i > 0)
}

/// Whether `c` is ㄧ, ㄨ or ㄩ, the finals that combine with a second one.
pub fn is_yi_wu_yu(c: char) -> bool {
    matches!(c, YI | WU | YU)
}

/// Row of `finals` (zero to two characters), or `None` if they don't form
/// a final.
pub fn finals_index(finals: &str) -> Option<usize> {
    let mut chars = finals.chars();
    let Some(first) = chars.next() else {
        return Some(0);
    };
    let second = chars.next();
    if chars.next().is_some() {
        return None;
    }

    let index = (first as u32).checked_sub(FIRST_FINAL)? as usize + 1;
    if index < YI_FINALS_INDEX {
        return second.is_none().then_some(index);
    }

    let (base, endings): (usize, &[char]) = match first {
        YI => (YI_FINALS_INDEX, &YI_ENDINGS),
        WU => (WU_FINALS_INDEX, &WU_ENDINGS),
        YU => (YU_FINALS_INDEX, &YU_ENDINGS),
        _ => return None,
    };
    match second {
        None => Some(base),
        Some(second) => endings
            .iter()
            .position(|&e| e == second)
            .map(|i| base + 1 + i),
    }
}

/// Grid cell of a toneless syllable.
pub fn syllables_index(syllables: &str) -> Option<usize> {
    let first = syllables.chars().next()?;
    let initials = initials_index(first)?;
    let finals = if initials == 0 {
        syllables
    } else {
        &syllables[first.len_utf8()..]
    };
    Some(finals_index(finals)? * INITIALS_COUNT + initials)
}

/// Index of tone mark `c`; anything else counts as the default tone (0).
pub fn tone_index(c: char) -> usize {
    TONES.iter().position(|&t| t == c).unwrap_or(0)
}

/// Whether `c` is a tone mark (the default tone included).
pub fn is_tone(c: char) -> bool {
    TONES.contains(&c)
}

/// Split the trailing tone mark off `input`.
///
/// Input without a tone mark gets the default tone. Returns `None` if
/// nothing is left once the tone is removed.
pub fn strip_tone(input: &str) -> Option<(&str, char)> {
    let last = input.chars().next_back()?;
    if !is_tone(last) {
        return Some((input, DEFAULT_TONE));
    }
    let syllables = &input[..input.len() - last.len_utf8()];
    (!syllables.is_empty()).then_some((syllables, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_cover_b_through_s() {
        assert_eq!(initials_index('ㄅ'), Some(1));
        assert_eq!(initials_index('ㄇ'), Some(3));
        assert_eq!(initials_index('ㄙ'), Some(21));
        assert_eq!(initials_index('ㄚ'), Some(0));
        assert_eq!(initials_index('貓'), Some(0));
        assert_eq!(initials_index('a'), None);
        assert!(is_initial('ㄓ'));
        assert!(!is_initial('ㄧ'));
    }

    #[test]
    fn simple_finals() {
        assert_eq!(finals_index(""), Some(0));
        assert_eq!(finals_index("ㄚ"), Some(1));
        assert_eq!(finals_index("ㄠ"), Some(7));
        assert_eq!(finals_index("ㄦ"), Some(13));
        assert_eq!(finals_index("ㄧ"), Some(14));
        assert_eq!(finals_index("ㄨ"), Some(25));
        assert_eq!(finals_index("ㄩ"), Some(34));
    }

    #[test]
    fn compound_finals() {
        assert_eq!(finals_index("ㄧㄚ"), Some(15));
        assert_eq!(finals_index("ㄧㄥ"), Some(24));
        assert_eq!(finals_index("ㄨㄚ"), Some(26));
        assert_eq!(finals_index("ㄨㄥ"), Some(33));
        assert_eq!(finals_index("ㄩㄝ"), Some(35));
        assert_eq!(finals_index("ㄩㄥ"), Some(FINALS_COUNT - 1));
    }

    #[test]
    fn invalid_finals() {
        assert_eq!(finals_index("ㄧㄟ"), None);
        assert_eq!(finals_index("ㄩㄚ"), None);
        assert_eq!(finals_index("ㄚㄚ"), None);
        assert_eq!(finals_index("ㄧㄚㄚ"), None);
        assert_eq!(finals_index("ㄇ"), None);
        assert_eq!(finals_index("ㄪ"), None);
    }

    #[test]
    fn syllables_combine_row_and_column() {
        assert_eq!(syllables_index("ㄇㄠ"), Some(7 * 22 + 3));
        assert_eq!(syllables_index("ㄉㄠ"), Some(7 * 22 + 5));
        assert_eq!(syllables_index("ㄅ"), Some(1));
        assert_eq!(syllables_index("ㄧㄠ"), Some(19 * 22));
        assert_eq!(syllables_index("ㄓㄨㄤ"), Some(32 * 22 + 15));
        assert_eq!(syllables_index(""), None);
        assert_eq!(syllables_index("aㄠ"), None);
        assert_eq!(syllables_index("ㄇㄇ"), None);
        assert!(syllables_index("ㄙㄩㄥ").unwrap() < SYLLABLE_INDEX_COUNT);
    }

    #[test]
    fn tones() {
        assert_eq!(tone_index(' '), 0);
        assert_eq!(tone_index('˙'), 1);
        assert_eq!(tone_index('ˋ'), 4);
        assert_eq!(tone_index('x'), 0);
        assert!(is_tone(' '));
        assert!(!is_tone('ㄠ'));
    }

    #[test]
    fn strip_tone_splits_last_mark() {
        assert_eq!(strip_tone("ㄇㄠˊ"), Some(("ㄇㄠ", 'ˊ')));
        assert_eq!(strip_tone("ㄇㄠ"), Some(("ㄇㄠ", DEFAULT_TONE)));
        assert_eq!(strip_tone("ㄇㄠ "), Some(("ㄇㄠ", DEFAULT_TONE)));
        assert_eq!(strip_tone("ˊ"), None);
        assert_eq!(strip_tone(""), None);
        // The neutral-tone dot strips to the same syllables.
        assert_eq!(
            strip_tone("ㄇㄠ˙").map(|(s, _)| s),
            strip_tone("ㄇㄠ").map(|(s, _)| s)
        );
    }
}
