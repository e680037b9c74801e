//! Query command - grounded question answering.

use super::{get_store, short_id};
use anyhow::{Context, Result};
use colored::Colorize;
use tokio::runtime::Runtime;
use trove_config::Config;
use trove_query::{QueryEngine, Retriever};
use trove_synth::SynthClient;

pub fn run(question: &str, show_sources: bool) -> Result<()> {
    let store = get_store()?;
    let config = Config::load().context("Failed to load configuration")?;

    let retriever = Retriever::new(store.clone(), config.retrieval.clone());
    let client =
        SynthClient::from_config(&config.synthesizer).context("Failed to create synthesizer client")?;
    let engine = QueryEngine::new(store.clone(), retriever, client);

    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!("{} {}", "Question:".cyan().bold(), question);
    println!("{}", "─".repeat(70));
    println!();

    let answer = rt
        .block_on(engine.answer(question))
        .context("Failed to answer question")?;

    println!("{}", "Answer:".green().bold());
    println!();
    println!("{}", answer.text);
    println!();

    if show_sources && !answer.sources.is_empty() {
        println!("{}", "─".repeat(70));
        println!("{}", "Sources:".cyan().bold());
        for (i, id) in answer.sources.iter().enumerate() {
            match store.get_record(id) {
                Ok(record) => println!(
                    "  {}. {} {}",
                    i + 1,
                    record.origin.white(),
                    format!("[{}]", short_id(id)).dimmed()
                ),
                Err(_) => println!("  {}. [{}]", i + 1, short_id(id)),
            }
        }
    }

    Ok(())
}
