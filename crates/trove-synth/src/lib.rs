//! Trove Synth - Answer synthesis against a local Ollama server.
//!
//! The synthesizer is an external dependency and is treated as such:
//! every call can fail, transient failures are retried with backoff,
//! and exhaustion surfaces as a typed "unavailable" error the CLI can
//! explain to the user.

mod client;
mod error;
mod prompt;
mod types;

pub use client::SynthClient;
pub use error::{SynthError, SynthResult};
pub use prompt::{build_prompt, build_system_prompt, ContextExcerpt};
pub use types::{GenerateRequest, GenerateResponse, ModelInfo};
