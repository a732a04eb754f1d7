//! `tcime`: build, inspect and query tcime dictionary tables.
//!
//! Usage:
//!   tcime build-cangjie --input cangjie.txt --output cangjie.bin
//!   tcime build-zhuyin --input zhuyin.txt --output zhuyin.bin
//!   tcime build-phrases --input phrases.txt --output phrases.bin
//!   tcime inspect cangjie cangjie.bin
//!   tcime lookup --config tcime.toml zhuyin ㄇㄠˊ
//!   tcime follow --config tcime.toml 綠
//!   tcime userdict import --db user.redb --input words.json
//!   tcime type --config tcime.toml cangjie
//!
//! Logging goes through `env_logger`; set `TCIME_LOG=debug` for more.

mod repl;
mod sources;
mod userdict;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use libcangjie::{CangjieDictionary, CangjieTable, SimplifiedMode};
use libzhuyin::{ZhuyinDictionary, ZhuyinTable};
use tcime_core::{
    DictionaryStore, ImeConfig, PackedTable, PhraseDictionary, PhraseTable, RedbWordList,
    load_table, save_table,
};
use tracing::info;

use crate::sources::SourceStats;

#[derive(Parser)]
#[command(name = "tcime")]
#[command(about = "Build, inspect and query Cangjie/Zhuyin dictionary tables")]
#[command(version)]
struct Cli {
    /// TOML configuration naming the tables and user dictionary
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Cangjie source (`<code> <characters>` per line)
    BuildCangjie {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "cangjie.bin")]
        output: PathBuf,
    },
    /// Compile a Zhuyin source (`<syllable[tone]> <characters>` per line)
    BuildZhuyin {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "zhuyin.bin")]
        output: PathBuf,
    },
    /// Compile a phrase list (one word per line)
    BuildPhrases {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "phrases.bin")]
        output: PathBuf,
    },
    /// Validate a compiled table and print its size
    Inspect {
        #[arg(value_enum)]
        kind: TableKind,
        path: PathBuf,
    },
    /// Print the candidates for a code or syllable
    Lookup {
        #[arg(value_enum)]
        scheme: Scheme,
        input: String,
        /// Use simplified Cangjie
        #[arg(long)]
        simplified: bool,
    },
    /// Print the words that follow a character
    Follow { character: char },
    /// Manage the persistent user dictionary
    Userdict {
        #[command(subcommand)]
        command: UserdictCommand,
    },
    /// Type keys read from stdin, one line at a time
    Type {
        #[arg(value_enum)]
        scheme: Scheme,
    },
}

#[derive(Subcommand)]
enum UserdictCommand {
    /// Add words from a JSON array
    Import {
        #[arg(short, long)]
        db: Option<PathBuf>,
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Write all words as JSON (to stdout by default)
    Export {
        #[arg(short, long)]
        db: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableKind {
    Cangjie,
    Zhuyin,
    Phrases,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scheme {
    Cangjie,
    Zhuyin,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("TCIME_LOG", "info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ImeConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ImeConfig::default(),
    };

    match cli.command {
        Commands::BuildCangjie { input, output } => {
            build(&input, &output, sources::parse_cangjie)
        }
        Commands::BuildZhuyin { input, output } => build(&input, &output, sources::parse_zhuyin),
        Commands::BuildPhrases { input, output } => {
            build(&input, &output, sources::parse_phrases)
        }
        Commands::Inspect { kind, path } => {
            match kind {
                TableKind::Cangjie => {
                    let table: CangjieTable = load(&path)?;
                    println!("{} rows, {} words", table.entry_count(), table.word_count());
                }
                TableKind::Zhuyin => {
                    let table: ZhuyinTable = load(&path)?;
                    println!("{} syllables, {} words", table.entry_count(), table.word_count());
                }
                TableKind::Phrases => {
                    let table: PhraseTable = load(&path)?;
                    let links: usize = table.runs().map(|(_, follows)| follows.len()).sum();
                    println!("{} keys, {} links", table.len(), links);
                }
            }
            Ok(())
        }
        Commands::Lookup {
            scheme,
            input,
            simplified,
        } => {
            let words = match scheme {
                Scheme::Cangjie => {
                    let path = required(&config.cangjie_table, "cangjie_table")?;
                    let mut dictionary = CangjieDictionary::open(path);
                    dictionary.set_simplified(simplified || config.cangjie_simplified);
                    dictionary.words(&libcangjie::keymap::translate(&input))
                }
                Scheme::Zhuyin => {
                    let path = required(&config.zhuyin_table, "zhuyin_table")?;
                    ZhuyinDictionary::open(path).words(&libzhuyin::keymap::translate(&input))
                }
            };
            println!("{words}");
            Ok(())
        }
        Commands::Follow { character } => {
            let phrases = open_phrases(&config)?.context("no phrase_table configured")?;
            println!("{}", phrases.following_words(character));
            Ok(())
        }
        Commands::Userdict { command } => run_userdict(&config, command),
        Commands::Type { scheme } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let phrases = open_phrases(&config)?;
            match scheme {
                Scheme::Cangjie => {
                    let mut session = libcangjie::session_from_config(&config);
                    if let Some(phrases) = phrases {
                        session = session.with_phrases(phrases);
                    }
                    info!(simplified = session.is_simplified(), "typing cangjie");
                    repl::run(
                        &mut session,
                        libcangjie::keymap::letter_for_key,
                        stdin.lock(),
                        stdout.lock(),
                    )
                }
                Scheme::Zhuyin => {
                    let mut session = libzhuyin::session_from_config(&config);
                    if let Some(phrases) = phrases {
                        session = session.with_phrases(phrases);
                    }
                    info!("typing zhuyin");
                    repl::run(
                        &mut session,
                        libzhuyin::keymap::symbol_for_key,
                        stdin.lock(),
                        stdout.lock(),
                    )
                }
            }
        }
    }
}

fn build<T: PackedTable>(
    input: &Path,
    output: &Path,
    parse: fn(&str) -> (T, SourceStats),
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let (table, stats) = parse(&text);
    save_table(&table, output).with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        table = T::NAME,
        entries = stats.entries,
        skipped = stats.skipped,
        output = %output.display(),
        "table written"
    );
    Ok(())
}

fn load<T: PackedTable>(path: &Path) -> Result<T> {
    load_table(path).with_context(|| format!("failed to load {} table {}", T::NAME, path.display()))
}

fn required<'a>(path: &'a Option<PathBuf>, key: &str) -> Result<&'a Path> {
    path.as_deref()
        .with_context(|| format!("no {key} configured"))
}

/// The configured phrase dictionary, personalized from the configured user
/// dictionary when there is one.
fn open_phrases(config: &ImeConfig) -> Result<Option<Arc<PhraseDictionary>>> {
    let Some(path) = &config.phrase_table else {
        return Ok(None);
    };
    let store = DictionaryStore::open(path);
    let phrases = match &config.user_dictionary {
        Some(db) => {
            let source = RedbWordList::open(db)
                .with_context(|| format!("failed to open user dictionary {}", db.display()))?;
            PhraseDictionary::with_user_dictionary(store, Arc::new(source), config.locale.clone())
        }
        None => PhraseDictionary::new(store),
    };
    Ok(Some(Arc::new(phrases)))
}

fn run_userdict(config: &ImeConfig, command: UserdictCommand) -> Result<()> {
    let open = |db: Option<PathBuf>| -> Result<RedbWordList> {
        let path = db
            .or_else(|| config.user_dictionary.clone())
            .context("no user dictionary given")?;
        RedbWordList::open(&path)
            .with_context(|| format!("failed to open user dictionary {}", path.display()))
    };
    match command {
        UserdictCommand::Import { db, input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let words = userdict::parse_json(&content)?;
            let list = open(db)?;
            let added = userdict::import(&list, &words)?;
            info!(added, path = %list.path().display(), "imported user words");
        }
        UserdictCommand::Export { db, output } => {
            let json = userdict::export_json(&open(db)?)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}
