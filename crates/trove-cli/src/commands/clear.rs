//! Clear command - wipe the knowledge base.

use super::get_store;
use anyhow::Result;
use colored::Colorize;

pub fn run(confirm: bool) -> Result<()> {
    let store = get_store()?;
    let stats = store.stats()?;

    if stats.total_records == 0 && stats.saved_queries == 0 {
        println!("{} The knowledge base is already empty.", "Note:".yellow().bold());
        return Ok(());
    }

    if !confirm {
        anyhow::bail!(
            "This deletes {} records and {} saved queries. Re-run with --confirm to proceed.",
            stats.total_records,
            stats.saved_queries
        );
    }

    store.clear()?;
    println!(
        "{} Deleted {} records and {} saved queries.",
        "✓".green(),
        stats.total_records,
        stats.saved_queries
    );

    Ok(())
}
