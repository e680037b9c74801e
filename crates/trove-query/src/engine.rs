//! Grounded answering: retrieve, synthesize, record.

use crate::error::{QueryError, QueryResult};
use crate::retriever::{ContextBundle, Retriever};
use tracing::{debug, info};
use trove_core::RecordId;
use trove_store::Store;
use trove_synth::{build_prompt, build_system_prompt, ContextExcerpt, GenerateRequest, SynthClient};

/// Fixed answer when nothing relevant is stored. The synthesizer is not
/// consulted in that case; there is nothing to ground an answer on.
pub const NO_CONTENT_ANSWER: &str =
    "No relevant content found in the knowledge base. Process some files first, or rephrase the question.";

/// An answered question with its supporting records.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Records whose excerpts grounded the answer, best first.
    pub sources: Vec<RecordId>,
}

/// Ties retrieval and synthesis together and records query history.
pub struct QueryEngine {
    store: Store,
    retriever: Retriever,
    client: SynthClient,
}

impl QueryEngine {
    pub fn new(store: Store, retriever: Retriever, client: SynthClient) -> Self {
        Self {
            store,
            retriever,
            client,
        }
    }

    /// Answer a question against the stored content.
    ///
    /// An empty context bundle short-circuits with a fixed answer. The
    /// question and answer are saved to history either way; synthesis
    /// failures are saved as unanswered.
    pub async fn answer(&self, question: &str) -> QueryResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::InvalidQuestion(
                "question must not be empty".to_string(),
            ));
        }

        let bundle = self.retriever.retrieve(question)?;

        if bundle.is_empty() {
            info!("No relevant records, skipping synthesis");
            self.store.save_query(question, Some(NO_CONTENT_ANSWER))?;
            return Ok(Answer {
                text: NO_CONTENT_ANSWER.to_string(),
                sources: vec![],
            });
        }

        debug!(excerpts = bundle.excerpts.len(), "Synthesizing answer");

        let response = match self.synthesize(question, &bundle).await {
            Ok(response) => response,
            Err(e) => {
                self.store.save_query(question, None)?;
                return Err(e);
            }
        };

        self.store.save_query(question, Some(response.as_str()))?;

        Ok(Answer {
            text: response,
            sources: bundle.record_ids(),
        })
    }

    async fn synthesize(&self, question: &str, bundle: &ContextBundle) -> QueryResult<String> {
        let context: Vec<ContextExcerpt> = bundle
            .excerpts
            .iter()
            .map(|e| ContextExcerpt {
                record_id: e.record_id.clone(),
                origin: e.origin.clone(),
                excerpt: e.excerpt.clone(),
            })
            .collect();

        let request = GenerateRequest::new(self.client.model(), build_prompt(question, &context))
            .with_system(build_system_prompt());

        let response = self.client.generate_with_retry(request).await?;
        Ok(response.response)
    }
}
