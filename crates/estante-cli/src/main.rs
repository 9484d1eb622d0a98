mod capture;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use estante_core::catalog::Catalog;
use estante_core::config::AppConfig;
use estante_core::engine::RecommendationEngine;
use estante_core::services::{OcrEngine, TranscriptionFailure, TranscriptionService};

use capture::{TextDumpOcr, TranscriptDump};

#[derive(Parser, Debug)]
#[command(
    name = "estante",
    version,
    about = "Find catalog books similar to a spoken or photographed title"
)]
struct Cli {
    /// Catalog CSV path (overrides the configured path).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Emit machine-readable JSON instead of a table.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve free text (a transcript or a typed title) and list
    /// similar books.
    Suggest {
        /// The noisy title text.
        query: Vec<String>,

        /// Read the transcript from a file produced by the speech
        /// service instead.
        #[arg(long, conflicts_with = "query")]
        transcript_file: Option<PathBuf>,

        /// Minimum fuzzy-match ratio to accept, 0 to 1.
        #[arg(long)]
        cutoff: Option<f64>,

        /// Number of similar books to list.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Resolve a photographed cover from an OCR text dump.
    Cover {
        /// File holding the raw text the OCR engine extracted.
        dump: PathBuf,

        /// Minimum fuzzy-match ratio to accept, 0 to 1.
        #[arg(long)]
        cutoff: Option<f64>,

        /// Number of similar books to list.
        #[arg(long)]
        top: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "estante=info".into()))
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone());
    let catalog = Catalog::load(&catalog_path)?;
    let engine = RecommendationEngine::new(catalog);

    match cli.command {
        Command::Suggest {
            query,
            transcript_file,
            cutoff,
            top,
        } => {
            let text = match transcript_file {
                Some(path) => match transcribe_file(&path, &config)? {
                    Some(text) => text,
                    None => return Ok(()),
                },
                None => query.join(" "),
            };
            if text.trim().is_empty() {
                println!("Provide a book title to search for.");
                return Ok(());
            }

            let cutoff = cutoff.unwrap_or(config.matching.transcript_cutoff);
            let top_n = top.unwrap_or(config.recommend.top_n);
            match engine.resolve_spoken(&text, cutoff) {
                Some(id) => present(&engine, id, top_n, cli.json)?,
                None => println!("No match found for \"{}\".", text.trim()),
            }
        }
        Command::Cover { dump, cutoff, top } => {
            let image = std::fs::read(&dump)
                .with_context(|| format!("reading OCR dump {}", dump.display()))?;
            let ocr_text = TextDumpOcr
                .extract_text(&image, &config.services.ocr_language)
                .with_context(|| format!("extracting text from {}", dump.display()))?;

            let cutoff = cutoff.unwrap_or(config.matching.cover_cutoff);
            let top_n = top.unwrap_or(config.recommend.top_n);
            match engine.resolve_cover(&ocr_text, cutoff) {
                Some(id) => present(&engine, id, top_n, cli.json)?,
                None => println!("No match found on the photographed cover."),
            }
        }
    }

    Ok(())
}

/// Run a transcript file through the transcription boundary. A
/// classified failure is a labeled user-facing outcome, not an error.
fn transcribe_file(path: &Path, config: &AppConfig) -> anyhow::Result<Option<String>> {
    let audio =
        std::fs::read(path).with_context(|| format!("reading transcript {}", path.display()))?;
    match TranscriptDump.transcribe(&audio, &config.services.transcription_language) {
        Ok(text) => Ok(Some(text)),
        Err(TranscriptionFailure::Unintelligible) => {
            println!("The recording could not be understood.");
            Ok(None)
        }
        Err(failure @ TranscriptionFailure::RequestError(_)) => {
            println!("Transcription failed: {failure}");
            Ok(None)
        }
    }
}

/// Print the resolved record and its ranked similar books.
fn present(engine: &RecommendationEngine, id: usize, top_n: usize, json: bool) -> anyhow::Result<()> {
    let record = engine
        .record(id)
        .context("resolved id missing from catalog")?;
    let results = engine.recommend(id, top_n);

    if json {
        output::print_json(record, &results)?;
    } else {
        output::print_detected(record);
        println!();
        output::print_table(&results);
    }
    Ok(())
}
