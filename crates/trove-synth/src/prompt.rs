//! Prompt assembly for grounded question answering.

/// One retrieved excerpt going into the prompt.
#[derive(Debug, Clone)]
pub struct ContextExcerpt {
    /// ID of the source record.
    pub record_id: String,
    /// Origin path or URL, shown so the model can cite it.
    pub origin: String,
    /// The excerpt text, already truncated by the retriever.
    pub excerpt: String,
}

/// Build the grounded prompt with numbered context excerpts.
pub fn build_prompt(question: &str, context: &[ContextExcerpt]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Use the following context to answer the question. If the context doesn't contain relevant information, say so.\n\n",
    );
    prompt.push_str("Context:\n");
    prompt.push_str("─────────────────────────────────────\n");

    for (i, item) in context.iter().enumerate() {
        prompt.push_str(&format!("\n[{}] From: {}\n", i + 1, item.origin));
        prompt.push_str(&item.excerpt);
        prompt.push('\n');
    }

    prompt.push_str("\n─────────────────────────────────────\n\n");
    prompt.push_str(&format!("Question: {}\n\n", question));
    prompt.push_str("Answer:");

    prompt
}

/// Build the system prompt.
pub fn build_system_prompt() -> String {
    r#"You are a helpful assistant that answers questions based on the provided context from a personal knowledge base.

Guidelines:
- Base your answers on the context provided
- If the context doesn't contain enough information, acknowledge that
- Be concise but thorough
- When relevant, mention which source(s) your answer is based on
- Do not make up information not present in the context"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_includes_question_and_sources() {
        let context = vec![
            ContextExcerpt {
                record_id: "id1".to_string(),
                origin: "/docs/geography.txt".to_string(),
                excerpt: "The capital of France is Paris.".to_string(),
            },
            ContextExcerpt {
                record_id: "id2".to_string(),
                origin: "/docs/history.md".to_string(),
                excerpt: "Paris has been inhabited since antiquity.".to_string(),
            },
        ];

        let prompt = build_prompt("What is the capital of France?", &context);

        assert!(prompt.contains("What is the capital of France?"));
        assert!(prompt.contains("[1] From: /docs/geography.txt"));
        assert!(prompt.contains("[2] From: /docs/history.md"));
        assert!(prompt.contains("The capital of France is Paris."));
    }

    #[test]
    fn test_prompt_with_empty_context_still_forms() {
        let prompt = build_prompt("Anything?", &[]);
        assert!(prompt.contains("Question: Anything?"));
        assert!(prompt.ends_with("Answer:"));
    }
}
