//! List command - show stored records.

use super::{get_store, short_id};
use anyhow::Result;
use colored::Colorize;
use trove_core::SourceStatus;

pub fn run(status_filter: Option<String>) -> Result<()> {
    let store = get_store()?;

    let filter = match status_filter.as_deref() {
        Some(s) => match SourceStatus::from_str(s) {
            Some(status) => Some(status),
            None => anyhow::bail!(
                "Unknown status '{}'. Use pending, processed, or failed.",
                s
            ),
        },
        None => None,
    };

    let records = store.list_records()?;
    let records: Vec<_> = records
        .into_iter()
        .filter(|r| filter.map(|f| r.status == f).unwrap_or(true))
        .collect();

    if records.is_empty() {
        println!(
            "{} No records found. Run 'trove process <path>' to add some.",
            "Note:".yellow().bold()
        );
        return Ok(());
    }

    println!("{} ({} records)", "Knowledge base".cyan().bold(), records.len());
    println!();

    for record in &records {
        let glyph = match record.status {
            SourceStatus::Processed => "✓".green(),
            SourceStatus::Pending => "…".yellow(),
            SourceStatus::Failed => "✗".red(),
        };

        println!(
            "  {} {} {} {}",
            glyph,
            format!("[{}]", short_id(&record.id)).dimmed(),
            format!("{:<13}", record.modality.as_str()).blue(),
            record.origin
        );

        if let Some(detail) = &record.error_detail {
            println!("      {}", detail.red().dimmed());
        }
    }

    Ok(())
}
