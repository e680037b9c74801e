//! Config command - show and locate configuration.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use trove_config::Config;

pub fn show() -> Result<()> {
    let paths = get_paths()?;
    let config = Config::load().context("Failed to load configuration")?;

    println!("{} {}", "Config file:".cyan().bold(), paths.config_file.display());
    if !paths.config_file.exists() {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    println!("{}", "[synthesizer]".blue());
    println!("  host = {}", config.synthesizer.host);
    println!("  model = {}", config.synthesizer.model);
    println!("  timeout_seconds = {}", config.synthesizer.timeout_seconds);
    println!("  retry_attempts = {}", config.synthesizer.retry_attempts);
    println!("  retry_backoff_ms = {}", config.synthesizer.retry_backoff_ms);
    println!();

    println!("{}", "[retrieval]".blue());
    println!("  top_k = {}", config.retrieval.top_k);
    println!("  excerpt_chars = {}", config.retrieval.excerpt_chars);
    println!("  relevance_floor = {}", config.retrieval.relevance_floor);
    println!();

    println!("{}", "[processing]".blue());
    println!("  ocr_enabled = {}", config.processing.ocr_enabled);
    println!("  transcribe = {}", config.processing.transcribe);
    println!("  whisper_model = {}", config.processing.whisper_model);

    Ok(())
}

pub fn path() -> Result<()> {
    let paths = get_paths()?;
    println!("{}", paths.config_file.display());
    Ok(())
}

pub fn init() -> Result<()> {
    let paths = get_paths()?;

    if paths.config_file.exists() {
        println!(
            "{} Config already exists at {}",
            "Note:".yellow().bold(),
            paths.config_file.display()
        );
        return Ok(());
    }

    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "{} Created default config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    Ok(())
}
