//! Process command - ingest files, directories, and video URLs.

use super::{get_store, short_id};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trove_config::{Capabilities, Config};
use trove_core::SourceStatus;
use trove_extract::{classify_input, detect_modality, ExtractError, Pipeline, SourceInput};
use walkdir::WalkDir;

pub fn run(inputs: &[String], recursive: bool, skip_processed: bool) -> Result<()> {
    let store = get_store()?;
    let config = Config::load().context("Failed to load configuration")?;
    let caps = Capabilities::probe();
    let pipeline = Pipeline::new(store, &config, &caps);

    // A single explicit file or URL is treated strictly: its failure is
    // the command's failure. Directory batches report and carry on.
    let single_explicit =
        inputs.len() == 1 && !Path::new(shellexpand::tilde(&inputs[0]).as_ref()).is_dir();

    let expanded = expand_inputs(inputs, recursive)?;
    if expanded.is_empty() {
        println!("{} Nothing to process.", "Note:".yellow().bold());
        return Ok(());
    }

    let to_process: Vec<SourceInput> = if skip_processed {
        let mut kept = Vec::new();
        for input in expanded {
            if pipeline.already_processed(&input.origin()) {
                println!("  {} {} (already processed)", "→".dimmed(), input.origin().dimmed());
            } else {
                kept.push(input);
            }
        }
        kept
    } else {
        expanded
    };

    if to_process.is_empty() {
        println!("{} Everything already processed.", "Note:".yellow().bold());
        return Ok(());
    }

    let bar = ProgressBar::new(to_process.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    // Ctrl-C stops the batch between inputs; the current file finishes
    // so no record is left half-written.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed))
            .context("Failed to install interrupt handler")?;
    }

    let mut processed = 0usize;
    let mut degraded = 0usize;
    let mut failed = 0usize;
    let mut unsupported = 0usize;
    let mut first_failure: Option<String> = None;

    let total = to_process.len();
    let entries = pipeline.ingest_batch(to_process, &cancel, |entry| {
        match &entry.outcome {
            Ok(outcome) => match outcome.status {
                SourceStatus::Processed if outcome.degraded => {
                    degraded += 1;
                    bar.println(format!(
                        "  {} {} [{}] (degraded: optional tools missing)",
                        "◐".yellow(),
                        outcome.origin,
                        short_id(&outcome.id).dimmed()
                    ));
                }
                SourceStatus::Processed => {
                    processed += 1;
                    bar.println(format!(
                        "  {} {} [{}]",
                        "✓".green(),
                        outcome.origin,
                        short_id(&outcome.id).dimmed()
                    ));
                }
                _ => {
                    failed += 1;
                    let detail = outcome.error_detail.clone().unwrap_or_default();
                    bar.println(format!("  {} {}: {}", "✗".red(), outcome.origin, detail));
                    if first_failure.is_none() {
                        first_failure = Some(format!("Processing failed: {detail}"));
                    }
                }
            },
            Err(ExtractError::UnsupportedModality(origin)) => {
                unsupported += 1;
                bar.println(format!(
                    "  {} {} (unsupported type, skipped)",
                    "→".dimmed(),
                    origin
                ));
                if first_failure.is_none() {
                    first_failure = Some(format!("Unsupported input type: {origin}"));
                }
            }
            Err(e) => {
                failed += 1;
                bar.println(format!("  {} {}: {}", "✗".red(), entry.input.origin(), e));
                if first_failure.is_none() {
                    first_failure = Some(format!("Ingestion failed: {e}"));
                }
            }
        }
        bar.inc(1);
    });

    let cancelled = entries.len() < total;
    bar.finish_and_clear();

    if single_explicit {
        if let Some(reason) = first_failure {
            anyhow::bail!("{reason}");
        }
    }

    if cancelled {
        println!("{} Interrupted; completed work is saved.", "Note:".yellow().bold());
    }

    println!();
    println!("{}", "Processing complete:".cyan().bold());
    println!("  {} processed", processed.to_string().green());
    if degraded > 0 {
        println!("  {} degraded (missing optional tools)", degraded.to_string().yellow());
    }
    if failed > 0 {
        println!("  {} failed", failed.to_string().red());
    }
    if unsupported > 0 {
        println!("  {} skipped (unsupported)", unsupported.to_string().dimmed());
    }

    Ok(())
}

/// Expand raw arguments into concrete inputs.
///
/// Directories are walked for files with supported extensions; other
/// files and URLs pass through untouched so unsupported explicit inputs
/// still produce a clear per-input message.
fn expand_inputs(inputs: &[String], recursive: bool) -> Result<Vec<SourceInput>> {
    let mut expanded = Vec::new();

    for raw in inputs {
        let raw = shellexpand::tilde(raw);
        let input = classify_input(&raw);
        match &input {
            SourceInput::File(path) if path.is_dir() => {
                let max_depth = if recursive { usize::MAX } else { 1 };
                for entry in WalkDir::new(path)
                    .max_depth(max_depth)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    let file_input = SourceInput::File(entry.path().to_path_buf());
                    if detect_modality(&file_input).is_ok() {
                        expanded.push(file_input);
                    }
                }
            }
            _ => expanded.push(input),
        }
    }

    Ok(expanded)
}
