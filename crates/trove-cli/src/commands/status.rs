//! Status command - store statistics and toolchain availability.

use super::get_store;
use anyhow::{Context, Result};
use colored::Colorize;
use tokio::runtime::Runtime;
use trove_config::{Capabilities, Config};
use trove_synth::SynthClient;

pub fn run() -> Result<()> {
    let store = get_store()?;
    let config = Config::load().context("Failed to load configuration")?;
    let stats = store.stats()?;

    println!("{}", "Knowledge base:".cyan().bold());
    println!("  Records:       {}", stats.total_records);
    println!("    processed:   {}", stats.processed.to_string().green());
    println!("    failed:      {}", stats.failed.to_string().red());
    println!("    pending:     {}", stats.pending.to_string().yellow());
    println!("  Saved queries: {}", stats.saved_queries);

    if !stats.records_by_modality.is_empty() {
        println!();
        println!("{}", "By modality:".cyan().bold());
        for (modality, count) in &stats.records_by_modality {
            println!("  {:<13} {}", modality, count);
        }
    }

    println!();
    println!("{}", "External toolchains:".cyan().bold());
    let caps = Capabilities::probe();
    for (tool, available) in caps.as_pairs() {
        if available {
            println!("  {} {}", "✓".green(), tool);
        } else {
            println!("  {} {} (not found, related inputs degrade)", "✗".red(), tool);
        }
    }

    println!();
    println!("{}", "Synthesizer:".cyan().bold());
    let client = SynthClient::from_config(&config.synthesizer)
        .context("Failed to create synthesizer client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;
    if rt.block_on(client.is_available()) {
        let model_installed = rt.block_on(client.has_model()).unwrap_or(false);
        println!("  {} reachable at {}", "✓".green(), config.synthesizer.host);
        if model_installed {
            println!("  {} model '{}' installed", "✓".green(), config.synthesizer.model);
        } else {
            println!(
                "  {} model '{}' missing (run 'ollama pull {}')",
                "✗".red(),
                config.synthesizer.model,
                config.synthesizer.model
            );
        }
    } else {
        println!(
            "  {} not reachable at {} (start it with 'ollama serve')",
            "✗".red(),
            config.synthesizer.host
        );
    }

    Ok(())
}
