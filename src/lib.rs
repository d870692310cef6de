// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod transcript;
pub mod types;
pub mod utils;

// Re-exports
pub use backend::ChatBackend;
pub use client::{API_KEY_ENV, Gemini};
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use transcript::{DEFAULT_TRANSCRIPT_PATH, Transcript, TranscriptStore};
pub use types::*;
