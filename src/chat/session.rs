//! Conversation state shared with the remote model.
//!
//! A [`ChatSession`] holds the context Gemini sees: every earlier turn in the
//! API's `Content` shape.  It is seeded from the saved transcript, grows by a
//! user turn and a model turn for each successful exchange, and is reseeded
//! on `clear`.

use crate::backend::ChatBackend;
use crate::error::{Error, Result};
use crate::observability::CHAT_SESSION_STARTS;
use crate::transcript::Transcript;
use crate::types::{Content, Model, ModelInfo};

/// A conversation with one remote model.
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    model: Model,
    context: Vec<Content>,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Starts a session seeded with `history`.
    ///
    /// Assistant messages become `model` turns and timestamps are dropped.
    pub fn start(backend: B, model: Model, history: &Transcript) -> Self {
        CHAT_SESSION_STARTS.click();
        Self {
            backend,
            model,
            context: history.to_contents(),
        }
    }

    /// Discards the context and reseeds it from `history`.
    pub fn restart(&mut self, history: &Transcript) {
        CHAT_SESSION_STARTS.click();
        self.context = history.to_contents();
    }

    /// Sends `text` as the next user turn and returns the reply.
    ///
    /// The context only grows when the call succeeds; any failure is reported
    /// as [`Error::RemoteCallFailed`] and leaves the context as it was.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let mut contents = self.context.clone();
        contents.push(Content::user(text));
        let reply = self
            .backend
            .generate(&self.model, contents)
            .await
            .map_err(|err| match err {
                err @ Error::RemoteCallFailed { .. } => err,
                err => Error::remote_call_failed(err),
            })?;
        self.context.push(Content::user(text));
        self.context.push(Content::model(reply.clone()));
        Ok(reply)
    }

    /// Every model in the remote catalog, as a [`Error::ModelList`] on failure.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.backend.list_models().await.map_err(Error::model_list)
    }

    /// The turns the model will see before the next message.
    pub fn context(&self) -> &[Content] {
        &self.context
    }

    /// The current model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
