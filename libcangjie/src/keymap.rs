//! Hardware keyboard layout: QWERTY keys to Cangjie letters.

use phf::phf_map;

static QWERTY: phf::Map<char, char> = phf_map! {
    'q' => '手', 'w' => '田', 'e' => '水', 'r' => '口', 't' => '廿',
    'y' => '卜', 'u' => '山', 'i' => '戈', 'o' => '人', 'p' => '心',
    'a' => '日', 's' => '尸', 'd' => '木', 'f' => '火', 'g' => '土',
    'h' => '竹', 'j' => '十', 'k' => '大', 'l' => '中',
    'x' => '難', 'c' => '金', 'v' => '女', 'b' => '月', 'n' => '弓', 'm' => '一',
};

/// The Cangjie letter on QWERTY key `key` (either case).
pub fn letter_for_key(key: char) -> Option<char> {
    QWERTY.get(&key.to_ascii_lowercase()).copied()
}

/// Translate a QWERTY string to Cangjie letters, keeping unmapped keys.
pub fn translate(keys: &str) -> String {
    keys.chars().map(|k| letter_for_key(k).unwrap_or(k)).collect()
}
