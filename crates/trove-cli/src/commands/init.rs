//! Initialize Trove.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use trove_config::{Capabilities, Config};
use trove_store::Store;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} Trove is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing Trove...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    let _store =
        Store::open(&paths.database_file).context("Failed to initialize database")?;
    println!(
        "  {} Created database: {}",
        "✓".green(),
        paths.database_file.display()
    );

    println!();
    println!("{}", "External toolchains:".cyan().bold());
    let caps = Capabilities::probe();
    for (tool, available) in caps.as_pairs() {
        if available {
            println!("  {} {}", "✓".green(), tool);
        } else {
            println!("  {} {} (optional, not found)", "✗".red(), tool);
        }
    }

    println!();
    println!("{}", "Trove initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Process some files: {}", "trove process ~/Documents/notes".cyan());
    println!("  2. Ask a question:     {}", "trove query \"what do my notes say about X?\"".cyan());

    Ok(())
}
