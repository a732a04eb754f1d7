//! Hardware keyboard layout: the standard (Dachen) QWERTY Zhuyin layout.
//!
//! Space types the default tone, so it is not part of the map.

use phf::phf_map;

static DACHEN: phf::Map<char, char> = phf_map! {
    '1' => 'ㄅ', 'q' => 'ㄆ', 'a' => 'ㄇ', 'z' => 'ㄈ',
    '2' => 'ㄉ', 'w' => 'ㄊ', 's' => 'ㄋ', 'x' => 'ㄌ',
    'e' => 'ㄍ', 'd' => 'ㄎ', 'c' => 'ㄏ',
    'r' => 'ㄐ', 'f' => 'ㄑ', 'v' => 'ㄒ',
    '5' => 'ㄓ', 't' => 'ㄔ', 'g' => 'ㄕ', 'b' => 'ㄖ',
    'y' => 'ㄗ', 'h' => 'ㄘ', 'n' => 'ㄙ',
    'u' => 'ㄧ', 'j' => 'ㄨ', 'm' => 'ㄩ',
    '8' => 'ㄚ', 'i' => 'ㄛ', 'k' => 'ㄜ', ',' => 'ㄝ',
    '9' => 'ㄞ', 'o' => 'ㄟ', 'l' => 'ㄠ', '.' => 'ㄡ',
    '0' => 'ㄢ', 'p' => 'ㄣ', ';' => 'ㄤ', '/' => 'ㄥ', '-' => 'ㄦ',
    '3' => 'ˇ', '4' => 'ˋ', '6' => 'ˊ', '7' => '˙',
};

/// The Zhuyin symbol or tone mark on QWERTY key `key` (letters in either
/// case).
pub fn symbol_for_key(key: char) -> Option<char> {
    DACHEN.get(&key.to_ascii_lowercase()).copied()
}

/// Translate a QWERTY string to Zhuyin, keeping unmapped keys.
pub fn translate(keys: &str) -> String {
    keys.chars().map(|k| symbol_for_key(k).unwrap_or(k)).collect()
}
