//! The ingestion pipeline: detect modality, extract, persist.
//!
//! Exactly one source record per supported input. Failures during
//! extraction become failed records so they stay visible in listings;
//! unsupported inputs never touch the store.

use crate::error::{ExtractError, ExtractResult};
use crate::extractor::{Extractor, SourceInput};
use crate::extractors::{DocumentExtractor, ImageExtractor, MediaExtractor};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use trove_config::{Capabilities, Config};
use trove_core::{record_id_for_origin, Modality, RecordId, SourceRecord, SourceStatus};
use trove_store::Store;

/// Classify an input by URL shape or file extension.
///
/// Web video links are recognized before any extension logic so that
/// `https://youtu.be/x.mp4`-style URLs do not fall into the file path.
/// Other URLs and unknown extensions are unsupported.
pub fn detect_modality(input: &SourceInput) -> ExtractResult<Modality> {
    match input {
        SourceInput::Url(url) => Modality::from_url(url)
            .ok_or_else(|| ExtractError::UnsupportedModality(url.clone())),
        SourceInput::File(path) => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            Modality::from_extension(ext)
                .ok_or_else(|| ExtractError::UnsupportedModality(path.display().to_string()))
        }
    }
}

/// Classify a raw CLI argument as URL or file path.
pub fn classify_input(raw: &str) -> SourceInput {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        SourceInput::Url(raw.to_string())
    } else {
        SourceInput::File(Path::new(raw).to_path_buf())
    }
}

/// What ingestion did to one input.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub id: RecordId,
    pub origin: String,
    pub modality: Modality,
    pub status: SourceStatus,
    /// Populated when status is `Failed`.
    pub error_detail: Option<String>,
    /// True when an optional toolchain was skipped.
    pub degraded: bool,
}

/// One input's result within a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub input: SourceInput,
    pub outcome: Result<IngestOutcome, ExtractError>,
}

/// The extraction dispatcher. Owns one extractor per modality, built
/// once from config and the capability probe.
pub struct Pipeline {
    store: Store,
    documents: DocumentExtractor,
    images: ImageExtractor,
    media: MediaExtractor,
}

impl Pipeline {
    pub fn new(store: Store, config: &Config, caps: &Capabilities) -> Self {
        Self {
            store,
            documents: DocumentExtractor::new(),
            images: ImageExtractor::new(caps, config.processing.ocr_enabled),
            media: MediaExtractor::new(caps, config.processing.transcribe, &config.processing.whisper_model),
        }
    }

    fn extractor_for(&self, modality: Modality) -> &dyn Extractor {
        match modality {
            Modality::Document => &self.documents,
            Modality::Image => &self.images,
            Modality::Audio | Modality::Video | Modality::YoutubeLink => &self.media,
        }
    }

    /// Ingest a single input.
    ///
    /// Returns `Ok` with a failed outcome when extraction fails: the
    /// record is persisted with the failure cause, and the caller decides
    /// what the failure means. Returns `Err` only for unsupported inputs
    /// (no record is created) and store errors.
    pub fn ingest(&self, input: &SourceInput) -> ExtractResult<IngestOutcome> {
        let modality = detect_modality(input)?;
        let origin = input.origin();

        info!(%origin, %modality, "Ingesting");

        let mut record = SourceRecord::pending(&origin, modality);
        let mut degraded = false;

        match self.extractor_for(modality).extract(input) {
            Ok(extraction) => {
                degraded = extraction.degraded;
                record.mark_processed(extraction.text, extraction.metadata);
            }
            Err(e) => {
                warn!(%origin, error = %e, "Extraction failed");
                record.mark_failed(e.to_string());
            }
        }

        self.store.upsert_record(&record)?;

        Ok(IngestOutcome {
            id: record.id,
            origin,
            modality,
            status: record.status,
            error_detail: record.error_detail,
            degraded,
        })
    }

    /// Ingest a batch of inputs, isolating failures per input.
    ///
    /// `on_entry` is called with each entry as it completes, so a front
    /// end can report progress without reimplementing the batch loop.
    /// `cancel` is checked between inputs; a set flag stops the batch
    /// after the current input finishes, leaving completed work intact.
    pub fn ingest_batch<F>(
        &self,
        inputs: Vec<SourceInput>,
        cancel: &Arc<AtomicBool>,
        mut on_entry: F,
    ) -> Vec<BatchEntry>
    where
        F: FnMut(&BatchEntry),
    {
        let mut entries = Vec::with_capacity(inputs.len());

        for input in inputs {
            if cancel.load(Ordering::Relaxed) {
                info!("Batch cancelled, stopping before remaining inputs");
                break;
            }
            let outcome = self.ingest(&input);
            let entry = BatchEntry { input, outcome };
            on_entry(&entry);
            entries.push(entry);
        }

        entries
    }

    /// Whether the origin has already been processed successfully.
    pub fn already_processed(&self, origin: &str) -> bool {
        let id = record_id_for_origin(origin);
        matches!(
            self.store.get_record(&id),
            Ok(record) if record.status == SourceStatus::Processed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pipeline(store: &Store) -> Pipeline {
        Pipeline::new(store.clone(), &Config::default(), &Capabilities::none())
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_detect_modality_dispatch() {
        let youtube = SourceInput::Url("https://youtu.be/abc".to_string());
        assert_eq!(detect_modality(&youtube).unwrap(), Modality::YoutubeLink);

        let doc = SourceInput::File(PathBuf::from("notes.md"));
        assert_eq!(detect_modality(&doc).unwrap(), Modality::Document);

        let image = SourceInput::File(PathBuf::from("scan.JPEG"));
        assert_eq!(detect_modality(&image).unwrap(), Modality::Image);
    }

    #[test]
    fn test_unsupported_inputs_are_rejected() {
        let binary = SourceInput::File(PathBuf::from("app.exe"));
        assert!(matches!(
            detect_modality(&binary),
            Err(ExtractError::UnsupportedModality(_))
        ));

        // A non-video URL is not ingestable even with a known extension
        let url = SourceInput::Url("https://example.com/file.pdf".to_string());
        assert!(matches!(
            detect_modality(&url),
            Err(ExtractError::UnsupportedModality(_))
        ));
    }

    #[test]
    fn test_classify_input() {
        assert!(matches!(
            classify_input("https://youtu.be/abc"),
            SourceInput::Url(_)
        ));
        assert!(matches!(classify_input("/docs/a.txt"), SourceInput::File(_)));
    }

    #[test]
    fn test_ingest_text_file_is_processed() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "facts.txt", "The capital of France is Paris.");

        let outcome = pipeline(&store)
            .ingest(&SourceInput::File(path.clone()))
            .unwrap();

        assert_eq!(outcome.status, SourceStatus::Processed);
        assert_eq!(outcome.id, record_id_for_origin(&path.display().to_string()));
        assert!(!outcome.degraded);

        let record = store.get_record(&outcome.id).unwrap();
        assert_eq!(record.extracted_text, "The capital of France is Paris.");
    }

    #[test]
    fn test_unsupported_input_creates_no_record() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.bin", "binary stuff");

        let result = pipeline(&store).ingest(&SourceInput::File(path));
        assert!(matches!(
            result,
            Err(ExtractError::UnsupportedModality(_))
        ));
        assert!(store.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_reingest_same_origin_updates_in_place() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "facts.txt", "first version");
        let pipe = pipeline(&store);

        pipe.ingest(&SourceInput::File(path.clone())).unwrap();
        std::fs::write(&path, "second version").unwrap();
        pipe.ingest(&SourceInput::File(path)).unwrap();

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].extracted_text, "second version");
    }

    #[test]
    fn test_corrupt_file_becomes_failed_record() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "broken.pdf", "%PDF-1.4 nonsense");

        let outcome = pipeline(&store).ingest(&SourceInput::File(path)).unwrap();

        assert_eq!(outcome.status, SourceStatus::Failed);
        assert!(outcome.error_detail.is_some());

        // The failed record is still listed but carries no text
        let record = store.get_record(&outcome.id).unwrap();
        assert_eq!(record.status, SourceStatus::Failed);
        assert!(record.extracted_text.is_empty());
    }

    #[test]
    fn test_image_without_ocr_is_degraded_but_processed() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "photo.png", "fake png");

        let outcome = pipeline(&store).ingest(&SourceInput::File(path)).unwrap();

        assert_eq!(outcome.status, SourceStatus::Processed);
        assert!(outcome.degraded);

        let record = store.get_record(&outcome.id).unwrap();
        assert_eq!(record.raw_metadata["ocr_skipped"], true);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let good = write_file(dir.path(), "good.txt", "solid content");
        let bad = write_file(dir.path(), "bad.pdf", "not a pdf");
        let unsupported = write_file(dir.path(), "skip.bin", "mystery");

        let cancel = Arc::new(AtomicBool::new(false));
        let entries = pipeline(&store).ingest_batch(
            vec![
                SourceInput::File(bad),
                SourceInput::File(good),
                SourceInput::File(unsupported),
            ],
            &cancel,
            |_| {},
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].outcome.as_ref().unwrap().status,
            SourceStatus::Failed
        );
        assert_eq!(
            entries[1].outcome.as_ref().unwrap().status,
            SourceStatus::Processed
        );
        assert!(entries[2].outcome.is_err());

        // One record per supported input, good one searchable
        assert_eq!(store.list_records().unwrap().len(), 2);
        assert_eq!(
            store.search_records(&["solid".to_string()]).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_batch_stops_at_cancel_flag() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", "alpha");
        let b = write_file(dir.path(), "b.txt", "beta");

        let cancel = Arc::new(AtomicBool::new(true));
        let entries = pipeline(&store).ingest_batch(
            vec![SourceInput::File(a), SourceInput::File(b)],
            &cancel,
            |_| {},
        );

        assert!(entries.is_empty());
        assert!(store.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_batch_reports_entries_as_they_complete() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", "alpha");
        let bad = write_file(dir.path(), "bad.pdf", "not a pdf");
        let skip = write_file(dir.path(), "skip.bin", "mystery");

        let cancel = Arc::new(AtomicBool::new(false));
        let mut seen = Vec::new();
        let entries = pipeline(&store).ingest_batch(
            vec![
                SourceInput::File(a),
                SourceInput::File(bad),
                SourceInput::File(skip),
            ],
            &cancel,
            |entry| seen.push(entry.input.origin()),
        );

        // Every entry is observed, in completion order
        assert_eq!(
            seen,
            entries.iter().map(|e| e.input.origin()).collect::<Vec<_>>()
        );
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_already_processed() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "facts.txt", "content");
        let pipe = pipeline(&store);
        let origin = path.display().to_string();

        assert!(!pipe.already_processed(&origin));
        pipe.ingest(&SourceInput::File(path)).unwrap();
        assert!(pipe.already_processed(&origin));
    }
}
