//! Lexical retriever: term overlap over stored extracted text.

use crate::error::QueryResult;
use tracing::debug;
use trove_config::RetrievalConfig;
use trove_core::{RecordId, SourceRecord, SourceStatus};
use trove_store::Store;

/// One record's contribution to the context bundle.
#[derive(Debug, Clone)]
pub struct RetrievedExcerpt {
    pub record_id: RecordId,
    pub origin: String,
    /// Bounded slice of the record's extracted text.
    pub excerpt: String,
    /// Lexical relevance score; higher is better.
    pub score: f64,
}

/// Ranked context going into the synthesizer prompt.
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    pub excerpts: Vec<RetrievedExcerpt>,
}

impl ContextBundle {
    pub fn is_empty(&self) -> bool {
        self.excerpts.is_empty()
    }

    pub fn record_ids(&self) -> Vec<RecordId> {
        self.excerpts.iter().map(|e| e.record_id.clone()).collect()
    }
}

/// Split a question into lowercase search terms.
///
/// Terms are alphanumeric runs of at least two characters, deduplicated
/// in first-seen order so the FTS query stays stable.
pub fn tokenize(question: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
    {
        if !terms.iter().any(|t| t == token) {
            terms.push(token.to_string());
        }
    }
    terms
}

/// Scores and ranks stored records against a question.
pub struct Retriever {
    store: Store,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(store: Store, config: RetrievalConfig) -> Self {
        Self { store, config }
    }

    /// Retrieve the top-scoring records as a context bundle.
    ///
    /// Ranking is deterministic: candidates arrive in insertion order and
    /// the sort is stable, so equal scores keep that order.
    pub fn retrieve(&self, question: &str) -> QueryResult<ContextBundle> {
        let terms = tokenize(question);
        if terms.is_empty() {
            return Ok(ContextBundle::default());
        }

        // FTS should accept the quoted tokens; if it ever rejects them,
        // fall back to scanning processed records directly.
        let candidates = match self.store.search_records(&terms) {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!(error = %e, "Full-text search failed, scanning all records");
                self.store
                    .list_records()?
                    .into_iter()
                    .filter(|r| r.status == SourceStatus::Processed)
                    .collect()
            }
        };
        debug!(
            terms = terms.len(),
            candidates = candidates.len(),
            "Scoring retrieval candidates"
        );

        let mut scored: Vec<(f64, &SourceRecord)> = candidates
            .iter()
            .map(|record| (score_record(record, &terms), record))
            .filter(|(score, _)| *score >= self.config.relevance_floor)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.config.top_k);

        let excerpts = scored
            .into_iter()
            .map(|(score, record)| RetrievedExcerpt {
                record_id: record.id.clone(),
                origin: record.origin.clone(),
                excerpt: select_excerpt(&record.extracted_text, &terms, self.config.excerpt_chars),
                score,
            })
            .collect();

        Ok(ContextBundle { excerpts })
    }
}

/// Lexical score: distinct matched terms dominate, total occurrences
/// break near-ties between records matching the same term set.
fn score_record(record: &SourceRecord, terms: &[String]) -> f64 {
    let text = record.extracted_text.to_lowercase();
    let mut distinct = 0usize;
    let mut occurrences = 0usize;

    for term in terms {
        let count = text.matches(term.as_str()).count();
        if count > 0 {
            distinct += 1;
            occurrences += count;
        }
    }

    distinct as f64 + (occurrences as f64 * 0.01).min(0.99)
}

/// Pick a bounded excerpt centered on the first matching term.
///
/// The window starts at the beginning of the line containing the first
/// match, so the excerpt opens on a sentence or paragraph boundary where
/// the source has them.
fn select_excerpt(text: &str, terms: &[String], max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let lower = trimmed.to_lowercase();
    // Lowercasing can shift byte offsets for non-ASCII text, so clamp
    // the position back onto a char boundary of the original string.
    let mut match_pos = terms
        .iter()
        .filter_map(|t| lower.find(t.as_str()))
        .min()
        .unwrap_or(0)
        .min(trimmed.len());
    while !trimmed.is_char_boundary(match_pos) {
        match_pos -= 1;
    }

    let window_start = trimmed[..match_pos]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let excerpt: String = trimmed[window_start..].chars().take(max_chars).collect();
    excerpt.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_core::{Modality, SourceRecord};

    fn seed(store: &Store, origin: &str, text: &str) -> RecordId {
        let mut record = SourceRecord::pending(origin, Modality::Document);
        record.mark_processed(text.to_string(), serde_json::json!({}));
        store.upsert_record(&record).unwrap();
        record.id
    }

    fn retriever(store: &Store) -> Retriever {
        Retriever::new(store.clone(), RetrievalConfig::default())
    }

    #[test]
    fn test_tokenize_normalizes_and_dedups() {
        let terms = tokenize("What is the Capital, the CAPITAL of France?");
        assert_eq!(
            terms,
            vec!["what", "is", "the", "capital", "of", "france"]
        );
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("a I x yz"), vec!["yz"]);
        assert!(tokenize("???").is_empty());
    }

    #[test]
    fn test_empty_store_gives_empty_bundle() {
        let store = Store::open_in_memory().unwrap();
        let bundle = retriever(&store)
            .retrieve("what is the capital of france")
            .unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_relevant_record_is_retrieved() {
        let store = Store::open_in_memory().unwrap();
        let id = seed(&store, "/docs/geo.txt", "The capital of France is Paris.");
        seed(&store, "/docs/rust.txt", "Rust has a borrow checker.");

        let bundle = retriever(&store)
            .retrieve("What is the capital of France?")
            .unwrap();

        assert_eq!(bundle.excerpts.len(), 1);
        assert_eq!(bundle.excerpts[0].record_id, id);
        assert!(bundle.excerpts[0].score >= 1.0);
    }

    #[test]
    fn test_better_overlap_ranks_higher() {
        let store = Store::open_in_memory().unwrap();
        let weak = seed(&store, "/docs/a.txt", "France exports wine.");
        let strong = seed(
            &store,
            "/docs/b.txt",
            "The capital of France is Paris, and Paris is large.",
        );

        let bundle = retriever(&store)
            .retrieve("capital of France Paris")
            .unwrap();

        assert_eq!(bundle.excerpts.len(), 2);
        assert_eq!(bundle.excerpts[0].record_id, strong);
        assert_eq!(bundle.excerpts[1].record_id, weak);
        assert!(bundle.excerpts[0].score > bundle.excerpts[1].score);
    }

    #[test]
    fn test_new_matching_record_joins_the_bundle() {
        let store = Store::open_in_memory().unwrap();
        seed(&store, "/docs/old.txt", "ancient history of rome");

        let before = retriever(&store).retrieve("rust borrow checker").unwrap();
        assert!(before.is_empty());

        let id = seed(&store, "/docs/new.txt", "the rust borrow checker enforces ownership");
        let after = retriever(&store).retrieve("rust borrow checker").unwrap();

        assert!(after.excerpts.iter().any(|e| e.record_id == id));
    }

    #[test]
    fn test_top_k_limits_bundle() {
        let store = Store::open_in_memory().unwrap();
        for i in 0..10 {
            seed(
                &store,
                &format!("/docs/{}.txt", i),
                "shared keyword everywhere",
            );
        }

        let config = RetrievalConfig {
            top_k: 3,
            ..RetrievalConfig::default()
        };
        let bundle = Retriever::new(store, config)
            .retrieve("shared keyword")
            .unwrap();

        assert_eq!(bundle.excerpts.len(), 3);
    }

    #[test]
    fn test_tie_break_is_insertion_order() {
        let store = Store::open_in_memory().unwrap();
        let first = seed(&store, "/docs/first.txt", "identical relevance text");
        let second = seed(&store, "/docs/second.txt", "identical relevance text");

        let bundle = retriever(&store).retrieve("identical relevance").unwrap();

        assert_eq!(bundle.excerpts[0].record_id, first);
        assert_eq!(bundle.excerpts[1].record_id, second);
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let store = Store::open_in_memory().unwrap();
        let long_text = format!(
            "{}\nThe needle sentence is here.\n{}",
            "filler line. ".repeat(200),
            "trailing content. ".repeat(200)
        );
        seed(&store, "/docs/long.txt", &long_text);

        let config = RetrievalConfig {
            excerpt_chars: 100,
            relevance_floor: 0.5,
            ..RetrievalConfig::default()
        };
        let bundle = Retriever::new(store, config).retrieve("needle sentence").unwrap();

        assert_eq!(bundle.excerpts.len(), 1);
        let excerpt = &bundle.excerpts[0].excerpt;
        assert!(excerpt.chars().count() <= 100);
        assert!(excerpt.starts_with("The needle sentence"));
    }

    #[test]
    fn test_retrieved_excerpt_flows_into_prompt() {
        let store = Store::open_in_memory().unwrap();
        seed(&store, "/docs/geo.txt", "The capital of France is Paris.");
        seed(&store, "/docs/unrelated.txt", "Compilers parse source code.");

        let bundle = retriever(&store)
            .retrieve("What is the capital of France?")
            .unwrap();
        assert_eq!(bundle.excerpts.len(), 1);

        let context: Vec<trove_synth::ContextExcerpt> = bundle
            .excerpts
            .iter()
            .map(|e| trove_synth::ContextExcerpt {
                record_id: e.record_id.clone(),
                origin: e.origin.clone(),
                excerpt: e.excerpt.clone(),
            })
            .collect();
        let prompt = trove_synth::build_prompt("What is the capital of France?", &context);

        assert!(prompt.contains("The capital of France is Paris."));
        assert!(prompt.contains("/docs/geo.txt"));
        assert!(!prompt.contains("Compilers parse"));
    }

    #[test]
    fn test_relevance_floor_filters_weak_matches() {
        let store = Store::open_in_memory().unwrap();
        seed(&store, "/docs/a.txt", "only france appears here");

        let config = RetrievalConfig {
            relevance_floor: 3.0,
            ..RetrievalConfig::default()
        };
        let bundle = Retriever::new(store, config)
            .retrieve("capital france paris")
            .unwrap();

        assert!(bundle.is_empty());
    }
}
