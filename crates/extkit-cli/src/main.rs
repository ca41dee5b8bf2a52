use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extkit_lint::Diagnostic;
use extkit_locator::{document_keys, Document};
use extkit_model::{ScrapeData, Severity};
use extkit_snippets::{build_metric_groups, FragmentContext};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Authoring tools for extension manifests
#[derive(Parser, Debug)]
#[command(name = "extkit")]
#[command(about = "Lint extension manifests and synthesize YAML snippets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lint a manifest and print its diagnostics
    Lint {
        /// Path to the manifest to lint
        manifest: PathBuf,

        /// Print diagnostics as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a YAML fragment for insertion into a manifest
    Snippet {
        #[command(subcommand)]
        kind: SnippetCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SnippetCommand {
    /// Generate metric groups from scraped data at an anchor line
    Metrics {
        /// Path to the manifest being edited
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,

        /// Path to the scrape result (JSON)
        #[arg(long, value_name = "FILE")]
        scrape: PathBuf,

        /// 0-based anchor line inside a datasource block
        #[arg(long)]
        line: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Lint { manifest, json } => lint_manifest(&manifest, json),
        Command::Snippet { kind } => match kind {
            SnippetCommand::Metrics {
                manifest,
                scrape,
                line,
            } => snippet_metrics(&manifest, &scrape, line),
        },
    }
}

fn lint_manifest(path: &Path, json: bool) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

    let diagnostics = extkit_lint::lint(&content);

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else if diagnostics.is_empty() {
        println!("✓ No problems found in {}", path.display());
    } else {
        for diag in &diagnostics {
            display_diagnostic(diag);
        }
    }

    if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        process::exit(1);
    }
    Ok(())
}

fn snippet_metrics(manifest: &Path, scrape: &Path, line: usize) -> Result<()> {
    let content = fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read manifest: {}", manifest.display()))?;
    let scrape_json = fs::read_to_string(scrape)
        .with_context(|| format!("Failed to read scrape data: {}", scrape.display()))?;

    let data = ScrapeData::from_json(&scrape_json)
        .with_context(|| format!("Invalid scrape data in {}", scrape.display()))?;

    let doc = Document::new(&content);
    let ctx = FragmentContext::at(&doc, line)
        .with_context(|| format!("No insertion context at line {line}"))?;

    let existing = document_keys(&doc);
    match build_metric_groups(&ctx, &data, &existing)? {
        Some(fragment) => {
            eprintln!(
                "# insert at line {}, column 0:",
                fragment.insert_line
            );
            print!("{}", fragment.text);
        }
        None => eprintln!("Nothing to insert"),
    }
    Ok(())
}

/// Display a diagnostic as one line of text.
///
/// Lines are shown 1-based to match editor gutters, even though every
/// serialized range stays 0-based.
fn display_diagnostic(diag: &Diagnostic) {
    let severity = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    eprintln!(
        "{}[{}] line {}: {}",
        severity,
        diag.code,
        diag.range.start.line + 1,
        diag.message
    );
}
