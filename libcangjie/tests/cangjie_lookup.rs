//! Integration tests for Cangjie lookup and typing.
//!
//! Fixture tables are compiled with the table builder, written to a temporary
//! blob and loaded back through the background loader, the same path a host
//! takes.

use std::sync::Arc;

use libcangjie::keymap;
use libcangjie::{
    create_session, primary_index, secondary_index, CangjieDictionary, CangjieTable,
    CangjieTableBuilder, SimplifiedMode,
};
use tcime_core::{
    save_table, FieldType, ImeContext, KeyCode, PhraseDictionary, PhraseTableBuilder,
};

const FIXTURE: &[(&str, &str)] = &[
    ("卜口", "占"),
    ("人大口", "知佑"),
    ("人口", "仙"),
    ("一一口", "吉"),
    ("日月", "明"),
    ("竹難竹田一", "簟"),
    ("女火竹竹一", "嫦"),
    ("十一一口", "喜"),
];

fn fixture_table() -> CangjieTable {
    let mut builder = CangjieTableBuilder::new();
    for (code, words) in FIXTURE {
        assert!(builder.add_words(code, words), "bad fixture code {code}");
    }
    builder.build()
}

fn fixture_dictionary() -> (tempfile::TempDir, CangjieDictionary) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cangjie.bin");
    save_table(&fixture_table(), &path).unwrap();
    let dict = CangjieDictionary::open(&path);
    (dir, dict)
}

#[test]
fn test_bu_kou_is_zhan() {
    let (_dir, dict) = fixture_dictionary();
    assert!(dict.words("卜口").contains('占'));
}

#[test]
fn test_ren_da_kou_has_zhi_and_you() {
    let (_dir, dict) = fixture_dictionary();
    let words = dict.words("人大口");
    assert!(words.contains('知'));
    assert!(words.contains('佑'));
    assert!(!words.contains('仙'));
}

#[test]
fn test_five_letter_results_match_their_codes() {
    let (_dir, dict) = fixture_dictionary();
    for (code, expected) in FIXTURE.iter().filter(|(code, _)| code.chars().count() == 5) {
        for word in dict.words(code).chars() {
            assert!(expected.contains(word));
            let registered = FIXTURE
                .iter()
                .find(|(_, words)| words.contains(word))
                .map(|(c, _)| *c)
                .unwrap();
            assert_eq!(primary_index(registered), primary_index(code));
            assert_eq!(secondary_index(registered), secondary_index(code));
        }
    }
}

#[test]
fn test_typing_with_qwerty_keys() {
    let (_dir, dict) = fixture_dictionary();
    let mut session = create_session(dict, false);
    let mut ctx = ImeContext::new();
    session.start(FieldType::Text);

    for key in "okr".chars().filter_map(keymap::letter_for_key) {
        assert!(session.on_key(KeyCode::Char(key), &mut ctx));
    }
    assert_eq!(ctx.preedit_text, "人大口");
    assert_eq!(session.candidates().candidates(), &['知', '佑']);

    assert!(session.on_key(KeyCode::Right, &mut ctx));
    assert!(session.on_key(KeyCode::Space, &mut ctx));
    assert_eq!(ctx.take_commit(), "佑");
    assert_eq!(ctx.preedit_text, "");
}

#[test]
fn test_picked_candidate_suggests_following_words() {
    let (_dir, dict) = fixture_dictionary();
    let mut phrases = PhraseTableBuilder::new();
    phrases.add_phrase("占領").add_phrase("占據");
    let phrases = PhraseDictionary::new(tcime_core::DictionaryStore::from_table(phrases.build()));
    let mut session = create_session(dict, false).with_phrases(Arc::new(phrases));
    let mut ctx = ImeContext::new();
    session.start(FieldType::Text);

    session.on_key(KeyCode::Char('卜'), &mut ctx);
    session.on_key(KeyCode::Char('口'), &mut ctx);
    session.on_key(KeyCode::Space, &mut ctx);
    assert_eq!(ctx.take_commit(), "占");
    assert_eq!(session.candidates().candidates(), &['領', '據']);

    session.on_key(KeyCode::Right, &mut ctx);
    session.on_key(KeyCode::Center, &mut ctx);
    assert_eq!(ctx.take_commit(), "領");
}

#[test]
fn test_simplified_mode_switch() {
    let (_dir, dict) = fixture_dictionary();
    let mut session = create_session(dict, false);
    let mut ctx = ImeContext::new();
    session.start(FieldType::Text);

    session.on_key(KeyCode::Char('人'), &mut ctx);
    session.set_simplified(true, &mut ctx);
    assert!(session.is_simplified());
    assert_eq!(session.composing_text(), "");
    assert!(!session.candidates_shown());

    for key in "人大口".chars() {
        assert!(session.on_key(KeyCode::Char(key), &mut ctx));
    }
    // The third letter is swallowed in simplified mode.
    assert_eq!(session.composing_text(), "人大");
    assert!(session.candidates().is_empty());

    session.on_key(KeyCode::Delete, &mut ctx);
    session.on_key(KeyCode::Char('口'), &mut ctx);
    let mut candidates = session.candidates().candidates().to_vec();
    candidates.sort_unstable();
    let mut expected: Vec<char> = "知佑仙".chars().collect();
    expected.sort_unstable();
    assert_eq!(candidates, expected);
}

#[test]
fn test_missing_blob_gives_empty_results() {
    let dir = tempfile::tempdir().unwrap();
    let dict = CangjieDictionary::open(dir.path().join("missing.bin"));
    assert_eq!(dict.words("卜口"), "");
}
