//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::error::{Error, Result};
use crate::transcript::DEFAULT_TRANSCRIPT_PATH;
use crate::types::Model;

/// Command-line arguments for the gemini-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Gemini API key.
    #[arrrg(optional, "Your Gemini API key (default: $GEMINI_API_KEY, then prompt)", "KEY")]
    pub api_key: Option<String>,

    /// Start a new chat session without loading the transcript.
    #[arrrg(flag, "Start a new chat session")]
    pub new: bool,

    /// List available models and exit.
    #[arrrg(flag, "List available models")]
    pub list_models: bool,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-1.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// Where the transcript lives.
    #[arrrg(optional, "Transcript file (default: chat_history.json)", "PATH")]
    pub history_file: Option<String>,

    /// HTTP request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 120)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Append API exchanges to this file as JSON lines.
    #[arrrg(optional, "Log API requests and responses as JSON lines", "PATH")]
    pub log_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat run.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// API key given on the command line, if any.
    pub api_key: Option<String>,

    /// Skip loading the transcript at startup.
    pub fresh: bool,

    /// Print the model catalog and exit.
    pub list_models: bool,

    /// Transcript location.
    pub transcript_path: PathBuf,

    /// Request timeout; `None` uses the client default.
    pub timeout: Option<Duration>,

    /// Client log location; `None` disables client logging.
    pub log_path: Option<PathBuf>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-1.5-flash
    /// - Transcript: chat_history.json in the working directory
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            api_key: None,
            fresh: false,
            list_models: false,
            transcript_path: PathBuf::from(DEFAULT_TRANSCRIPT_PATH),
            timeout: None,
            log_path: None,
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Starts without the saved transcript.
    pub fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }

    /// Sets the transcript path.
    pub fn with_transcript_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.transcript_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the client log path.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or_default();

        ChatConfig {
            model,
            api_key: args.api_key,
            fresh: args.new,
            list_models: args.list_models,
            transcript_path: args
                .history_file
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPT_PATH)),
            timeout: args.timeout.map(Duration::from_secs),
            log_path: args.log_file.map(PathBuf::from),
            use_color: !args.no_color,
        }
    }
}

/// Picks the API key: the explicit one, then the environment, then `prompt`.
///
/// Blank values are skipped.  A failed or blank prompt is a
/// [`Error::RemoteInit`].
pub fn resolve_api_key<F>(
    explicit: Option<String>,
    from_env: Option<String>,
    prompt: F,
) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    if let Some(key) = [explicit, from_env]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
    {
        return Ok(key);
    }
    let key = prompt()?.trim().to_string();
    if key.is_empty() {
        return Err(Error::remote_init("no API key given"));
    }
    Ok(key)
}
