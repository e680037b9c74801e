//! Trove Extract - Per-modality extraction and the ingestion pipeline.
//!
//! The dispatcher detects a modality from file identity (extension or URL
//! shape), routes to the matching extractor, and writes exactly one source
//! record per input. Extractor failures are isolated per file; a batch
//! never aborts because one input was unreadable.

mod error;
mod extractor;
mod extractors;
mod pipeline;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{Extraction, Extractor, SourceInput};
pub use extractors::{DocumentExtractor, ImageExtractor, MediaExtractor};
pub use pipeline::{classify_input, detect_modality, BatchEntry, IngestOutcome, Pipeline};
