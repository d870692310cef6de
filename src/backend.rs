//! The seam between the chat loop and the remote model.

use crate::error::Result;
use crate::types::{Content, Model, ModelInfo};

/// A remote generative model the chat session can talk to.
///
/// [`Gemini`](crate::Gemini) is the production implementation; tests supply
/// scripted ones.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Answer the last turn of `contents` and return the reply text.
    async fn generate(&self, model: &Model, contents: Vec<Content>) -> Result<String>;

    /// Every model in the remote catalog.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}
