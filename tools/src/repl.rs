//! Line-driven typing loop for trying a session from a terminal.
//!
//! Each input line is split on whitespace. A token starting with `:` names a
//! special key (`:space`, `:enter`, `:del`, `:left`, `:right`, `:up`,
//! `:down`, `:ok`, `:esc`); any other token is typed one key at a time
//! through the keyboard layout. After every line the committed text, the
//! composing text and the candidate page are printed.

use std::io::{BufRead, Write};

use anyhow::Result;
use tcime_core::{ComposeRule, FieldType, ImeContext, ImeSession, KeyCode, WordDictionary};

pub fn special_key(name: &str) -> Option<KeyCode> {
    let key = match name {
        "space" => KeyCode::Space,
        "enter" => KeyCode::Enter,
        "del" => KeyCode::Delete,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "ok" => KeyCode::Center,
        "esc" => KeyCode::ModeChange,
        _ => return None,
    };
    Some(key)
}

pub fn run<R, D>(
    session: &mut ImeSession<R, D>,
    layout: fn(char) -> Option<char>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()>
where
    R: ComposeRule,
    D: WordDictionary,
{
    let mut ctx = ImeContext::new();
    session.start(FieldType::Text);
    for line in input.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            if let Some(name) = token.strip_prefix(':') {
                match special_key(name) {
                    Some(key) => {
                        session.on_key(key, &mut ctx);
                    }
                    None => writeln!(out, "unknown key :{name}")?,
                }
                continue;
            }
            for c in token.chars() {
                session.on_key(KeyCode::Char(layout(c).unwrap_or(c)), &mut ctx);
            }
        }
        writeln!(out, "{}", render(session, &mut ctx))?;
    }
    session.finish(&mut ctx);
    Ok(())
}

fn render<R: ComposeRule, D: WordDictionary>(
    session: &ImeSession<R, D>,
    ctx: &mut ImeContext,
) -> String {
    let mut line = String::new();
    let committed = ctx.take_commit();
    if !committed.is_empty() {
        line.push_str(&format!("commit {committed:?}  "));
    }
    line.push_str(&format!("[{}]", ctx.preedit_text));
    if session.candidates_shown() {
        let list = session.candidates();
        for (i, c) in list.current_page_candidates().iter().enumerate() {
            let mark = if list.cursor() == Some(i) { "*" } else { "" };
            line.push_str(&format!(" {mark}{}.{c}", i + 1));
        }
        if list.num_pages() > 1 {
            line.push_str(&format!(" ({}/{})", list.current_page() + 1, list.num_pages()));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcangjie::{create_session, keymap, CangjieDictionary, CangjieTableBuilder};

    fn typed(input: &str) -> Vec<String> {
        let mut builder = CangjieTableBuilder::new();
        builder.add_words("人大口", "知佑");
        builder.add_words("卜口", "占");
        let dict = CangjieDictionary::from_table(builder.build());
        let mut session = create_session(dict, false);
        let mut out = Vec::new();
        run(&mut session, keymap::letter_for_key, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn typing_and_picking() {
        let lines = typed("okr\n:right :space\n");
        assert_eq!(lines, vec!["[人大口] *1.知 2.佑", "commit \"佑\"  []"]);
    }

    #[test]
    fn unknown_special_key() {
        let lines = typed(":nope\n");
        assert_eq!(lines, vec!["unknown key :nope", "[]"]);
    }

    #[test]
    fn unmapped_keys_commit_verbatim() {
        let lines = typed("z\n");
        assert_eq!(lines, vec!["commit \"z\"  []"]);
    }
}
