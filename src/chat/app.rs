//! The interactive command loop.
//!
//! [`ChatApp`] owns the transcript, the store it is saved to, and the
//! session with the remote model.  The binary feeds it one line at a time;
//! everything it prints goes through the [`Renderer`] it is handed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::backend::ChatBackend;
use crate::chat::commands::{ChatCommand, parse_command};
use crate::chat::session::ChatSession;
use crate::error::{Error, Result};
use crate::observability::{CHAT_TURN_FAILURES, CHAT_TURNS};
use crate::render::Renderer;
use crate::transcript::{Transcript, TranscriptStore};
use crate::types::{MessageRole, Model, ModelInfo};

/// How often a pending request checks for Ctrl-C.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// What the caller should do after a line is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,

    /// Stop reading; the transcript has been saved.
    Exit,
}

/// The chat application state.
pub struct ChatApp<B: ChatBackend> {
    session: ChatSession<B>,
    transcript: Transcript,
    store: TranscriptStore,
    interrupted: Option<Arc<AtomicBool>>,
}

impl<B: ChatBackend> ChatApp<B> {
    /// Creates the app and starts a session seeded with `transcript`.
    pub fn new(backend: B, model: Model, store: TranscriptStore, transcript: Transcript) -> Self {
        let session = ChatSession::start(backend, model, &transcript);
        Self {
            session,
            transcript,
            store,
            interrupted: None,
        }
    }

    /// Abandons a pending reply whenever `interrupted` becomes true.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    /// The in-memory transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The session with the remote model.
    pub fn session(&self) -> &ChatSession<B> {
        &self.session
    }

    /// Prints the loaded transcript, if there is one.
    pub fn replay(&self, renderer: &mut dyn Renderer) {
        if self.transcript.is_empty() {
            return;
        }
        renderer.print_header("Previous Conversation");
        for message in self.transcript.messages() {
            match message.role {
                MessageRole::User => renderer.print_user_message(&message.content),
                MessageRole::Assistant => renderer.print_assistant_message(&message.content),
            }
        }
        renderer.print_header("New Conversation");
    }

    /// Handles one line of input.
    pub async fn handle_line(&mut self, line: &str, renderer: &mut dyn Renderer) -> Flow {
        let Some(command) = parse_command(line) else {
            return Flow::Continue;
        };
        match command {
            ChatCommand::Exit => {
                if self.save(renderer) {
                    renderer.print_success("Conversation saved. Goodbye!");
                    Flow::Exit
                } else {
                    renderer.print_warning(
                        "Not exiting so the conversation is not lost. Fix the problem and try again, or press Ctrl-D to quit anyway.",
                    );
                    Flow::Continue
                }
            }
            ChatCommand::Save => {
                if self.save(renderer) {
                    renderer.print_success("Conversation saved!");
                }
                Flow::Continue
            }
            ChatCommand::Clear => {
                self.transcript.clear();
                self.session.restart(&self.transcript);
                renderer.print_success("Chat history cleared!");
                Flow::Continue
            }
            ChatCommand::ListModels => {
                self.list_models(renderer).await;
                Flow::Continue
            }
            ChatCommand::Message(text) => {
                let _ = self.chat(&text, renderer).await;
                Flow::Continue
            }
        }
    }

    /// Runs one chat turn.
    ///
    /// The user message is recorded before the call.  On failure it stays in
    /// the transcript without a reply, the error is printed, and the error is
    /// returned for callers that care.
    pub async fn chat(&mut self, text: &str, renderer: &mut dyn Renderer) -> Result<String> {
        CHAT_TURNS.click();
        self.transcript.push_user(text);

        renderer.start_waiting("AI is thinking...");
        let result = self.send_interruptibly(text).await;
        renderer.stop_waiting();

        match result {
            Ok(reply) => {
                self.transcript.push_assistant(reply.clone());
                renderer.print_assistant_message(&reply);
                Ok(reply)
            }
            Err(err) => {
                CHAT_TURN_FAILURES.click();
                renderer.print_error(&format!("Error: {err}"));
                Err(err)
            }
        }
    }

    /// Lists the remote models, printing each name.
    ///
    /// Failures are printed and produce an empty list.
    pub async fn list_models(&self, renderer: &mut dyn Renderer) -> Vec<String> {
        renderer.start_waiting("Fetching models...");
        let result = self.session.list_models().await;
        renderer.stop_waiting();
        match result {
            Ok(models) => print_models(renderer, &models),
            Err(err) => {
                renderer.print_error(&err.to_string());
                Vec::new()
            }
        }
    }

    /// Saves the transcript, printing any error.  Returns true on success.
    pub fn save(&self, renderer: &mut dyn Renderer) -> bool {
        match self.store.save(&self.transcript) {
            Ok(()) => true,
            Err(err) => {
                renderer.print_error(&format!("Error saving conversation: {err}"));
                false
            }
        }
    }

    /// Saves on the way out when input ends without an `exit`.
    pub fn finish(&self, renderer: &mut dyn Renderer) {
        if self.save(renderer) {
            renderer.print_success("Conversation saved. Goodbye!");
        }
    }

    async fn send_interruptibly(&mut self, text: &str) -> Result<String> {
        let Some(interrupted) = self.interrupted.clone() else {
            return self.session.send(text).await;
        };
        interrupted.store(false, Ordering::Relaxed);
        tokio::select! {
            result = self.session.send(text) => result,
            _ = wait_for(&interrupted) => Err(Error::remote_call_failed(
                Error::interrupted("reply abandoned"),
            )),
        }
    }
}

/// Prints a model catalog and returns the names in order.
pub fn print_models(renderer: &mut dyn Renderer, models: &[ModelInfo]) -> Vec<String> {
    renderer.print_header("Available Models");
    models
        .iter()
        .map(|model| {
            renderer.print_info(&format!("- {}", model.name));
            model.name.clone()
        })
        .collect()
}

async fn wait_for(flag: &AtomicBool) {
    while !flag.load(Ordering::Relaxed) {
        tokio::time::sleep(INTERRUPT_POLL).await;
    }
}
