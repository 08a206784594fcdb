//! Command-line interface

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use vl_highlight::{RootWordSet, attribute, stem};
use vl_lens::{PassReport, Session, WordStore};

#[derive(Parser, Debug)]
#[command(name = "vl-lens", about = "Highlight saved words and their inflections", version)]
pub struct Cli {
    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Highlight saved words in an HTML page and print the result.
    Annotate {
        /// HTML file to annotate.
        page: PathBuf,
        /// Comma-separated words to highlight.
        #[arg(long, value_delimiter = ',')]
        words: Vec<String>,
        /// Backup bundle to load words from.
        #[arg(long)]
        words_file: Option<PathBuf>,
        /// Highlight color (any CSS color).
        #[arg(long)]
        color: Option<String>,
    },
    /// Print the inflected forms generated for a word.
    Stem {
        word: String,
    },
    /// Show which saved word a token is credited to.
    Match {
        token: String,
        /// Comma-separated saved words.
        #[arg(long, value_delimiter = ',', required = true)]
        words: Vec<String>,
    },
}

#[derive(Serialize)]
struct MarkerSummary {
    root: String,
    text: String,
}

#[derive(Serialize)]
struct AnnotateOutput {
    html: String,
    report: PassReport,
    markers: Vec<MarkerSummary>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Annotate {
            page,
            words,
            words_file,
            color,
        } => handle_annotate(page, words, words_file, color, cli.json),
        Command::Stem { word } => handle_stem(&word, cli.json),
        Command::Match { token, words } => handle_match(&token, &words, cli.json),
    }
}

fn handle_annotate(
    page: PathBuf,
    words: Vec<String>,
    words_file: Option<PathBuf>,
    color: Option<String>,
    as_json: bool,
) -> Result<()> {
    let html = fs::read_to_string(&page)
        .with_context(|| format!("failed to read {}", page.display()))?;

    let mut store = WordStore::default();
    if let Some(path) = words_file {
        let bundle = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let report = store
            .import_json(&bundle)
            .with_context(|| format!("failed to import {}", path.display()))?;
        tracing::debug!("Loaded {} words from bundle", report.words_added.len());
    }
    for word in words.iter().filter(|w| !w.trim().is_empty()) {
        store.save_word(word, None)?;
    }
    if let Some(color) = color {
        store.set_highlight_color(&color);
    }
    if store.is_empty() {
        tracing::warn!("No words given; the page is printed unchanged");
    }

    let mut session = Session::from_html(&html, store)
        .with_context(|| format!("failed to parse {}", page.display()))?;
    let report = session.force_refresh();

    if as_json {
        let output = AnnotateOutput {
            html: session.html(),
            report,
            markers: session
                .markers()
                .into_iter()
                .map(|hit| MarkerSummary {
                    root: hit.root,
                    text: hit.display_text,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", session.html());
    }
    Ok(())
}

fn handle_stem(word: &str, as_json: bool) -> Result<()> {
    let forms = stem(word)?;
    if as_json {
        let payload = json!({ "word": word, "forms": forms });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for form in forms {
            println!("{form}");
        }
    }
    Ok(())
}

fn handle_match(token: &str, words: &[String], as_json: bool) -> Result<()> {
    if token.trim().is_empty() {
        bail!("token cannot be empty");
    }
    let roots: RootWordSet = words.iter().collect();
    let attribution = attribute(token, &roots);

    if as_json {
        let payload = json!({ "token": token, "attribution": attribution });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let (before, root, after) = attribution.split(token);
        println!(
            "{token} -> {} ({:?}): {before}[{root}]{after}",
            attribution.root, attribution.kind
        );
    }
    Ok(())
}
