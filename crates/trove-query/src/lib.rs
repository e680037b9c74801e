//! Trove Query - Lexical retrieval and grounded answering.
//!
//! Retrieval is deterministic: tokenize the question, pull full-text
//! candidates from the store, score them by term overlap, keep the best
//! few, and trim each to an excerpt. The answer itself comes from the
//! external synthesizer; when nothing relevant is stored, the engine
//! answers directly without calling it.

mod engine;
mod error;
mod retriever;

pub use engine::{Answer, QueryEngine, NO_CONTENT_ANSWER};
pub use error::{QueryError, QueryResult};
pub use retriever::{tokenize, ContextBundle, RetrievedExcerpt, Retriever};
