//! History command - recent questions and answers.

use super::get_store;
use anyhow::Result;
use colored::Colorize;

pub fn run(limit: i64) -> Result<()> {
    let store = get_store()?;
    let queries = store.list_queries(limit)?;

    if queries.is_empty() {
        println!("{} No queries yet.", "Note:".yellow().bold());
        return Ok(());
    }

    println!("{}", "Recent queries:".cyan().bold());
    println!();

    for saved in &queries {
        println!(
            "  {} {}",
            saved.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            saved.question.white().bold()
        );
        match &saved.answer {
            Some(answer) => {
                let mut preview: String = answer.chars().take(120).collect();
                if answer.chars().count() > 120 {
                    preview.push('…');
                }
                println!("    {}", preview);
            }
            None => println!("    {}", "(no answer: synthesis failed)".red().dimmed()),
        }
        println!();
    }

    Ok(())
}
