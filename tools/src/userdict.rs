//! JSON import and export of the persistent user word list.
//!
//! Export writes `[{"word": ..., "locale": ...}]`. Import also accepts bare
//! strings, which apply to every locale.

use anyhow::{Context, Result};
use serde::Deserialize;
use tcime_core::{RedbWordList, UserWord};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportEntry {
    Word(String),
    Entry(UserWord),
}

impl From<ImportEntry> for UserWord {
    fn from(entry: ImportEntry) -> Self {
        match entry {
            ImportEntry::Word(word) => UserWord::new(word, None),
            ImportEntry::Entry(entry) => entry,
        }
    }
}

pub fn parse_json(content: &str) -> Result<Vec<UserWord>> {
    let entries: Vec<ImportEntry> =
        serde_json::from_str(content).context("user words must be a JSON array")?;
    Ok(entries.into_iter().map(UserWord::from).collect())
}

/// Add `words` to `list`, skipping blanks. Returns how many were added.
pub fn import(list: &RedbWordList, words: &[UserWord]) -> Result<usize> {
    let mut added = 0;
    for entry in words.iter().filter(|w| !w.word.trim().is_empty()) {
        list.add_word(&entry.word, entry.locale.as_deref())
            .with_context(|| format!("failed to add '{}'", entry.word))?;
        added += 1;
    }
    Ok(added)
}

pub fn export_json(list: &RedbWordList) -> Result<String> {
    let entries = list.entries().context("failed to read the user dictionary")?;
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcime_core::UserDictionarySource;

    #[test]
    fn bare_strings_and_objects() {
        let words = parse_json(r#"["綠茶", {"word": "綠豆", "locale": "zh_TW"}, {"word": "綠色"}]"#)
            .unwrap();
        assert_eq!(
            words,
            vec![
                UserWord::new("綠茶", None),
                UserWord::new("綠豆", Some("zh_TW")),
                UserWord::new("綠色", None),
            ]
        );
    }

    #[test]
    fn not_an_array() {
        assert!(parse_json(r#"{"word": "綠茶"}"#).is_err());
    }

    #[test]
    fn import_then_export() {
        let dir = tempfile::tempdir().unwrap();
        let list = RedbWordList::open(dir.path().join("user.redb")).unwrap();
        let words = parse_json(r#"["綠茶", " ", {"word": "綠豆", "locale": "zh_HK"}]"#).unwrap();
        assert_eq!(import(&list, &words).unwrap(), 2);

        assert_eq!(list.words("zh_TW").unwrap(), vec!["綠茶".to_string()]);
        let exported: Vec<UserWord> = serde_json::from_str(&export_json(&list).unwrap()).unwrap();
        assert_eq!(exported.len(), 2);
        assert!(exported.contains(&UserWord::new("綠豆", Some("zh_HK"))));
    }
}
