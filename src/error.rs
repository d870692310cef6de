//! Error types for gemini-chat.
//!
//! The chat loop only ever reasons about four kinds of failure: a transcript
//! that could not be loaded, a remote client that could not be set up, a
//! single turn that failed, and a model listing that failed.  The lower-level
//! kinds below are produced by the HTTP client and the transcript store and
//! folded into those four at the session and dispatcher boundaries.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for gemini-chat.
#[derive(Clone, Debug)]
pub enum Error {
    /// The persisted transcript could not be read or parsed.
    HistoryLoad {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Credential or model setup failed; the session cannot start.
    RemoteInit {
        /// Human-readable error message.
        message: String,
    },

    /// A single chat turn failed at the remote end.
    RemoteCallFailed {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<Error>>,
    },

    /// Listing the remote model catalog failed.
    ModelList {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<Error>>,
    },

    /// The API returned a non-success status.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Google status string (e.g. `INVALID_ARGUMENT`).
        status: Option<String>,
        /// Human-readable error message.
        message: String,
    },

    /// The API rejected the credential.
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// Could not reach the API.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The request exceeded the client timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// The request was abandoned by the user.
    Interrupted {
        /// Human-readable error message.
        message: String,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },
}

impl Error {
    /// Creates a new history load error.
    pub fn history_load(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HistoryLoad {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new remote initialization error.
    pub fn remote_init(message: impl Into<String>) -> Self {
        Error::RemoteInit {
            message: message.into(),
        }
    }

    /// Wraps a lower-level error as a failed chat turn.
    pub fn remote_call_failed(source: Error) -> Self {
        Error::RemoteCallFailed {
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// Wraps a lower-level error as a failed model listing.
    pub fn model_list(source: Error) -> Self {
        Error::ModelList {
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a new API error.
    pub fn api(status_code: u16, status: Option<String>, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            status,
            message: message.into(),
        }
    }

    /// Creates a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new interrupted error.
    pub fn interrupted(message: impl Into<String>) -> Self {
        Error::Interrupted {
            message: message.into(),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Returns true if this error is a transcript load failure.
    pub fn is_history_load(&self) -> bool {
        matches!(self, Error::HistoryLoad { .. })
    }

    /// Returns true if this error is a remote initialization failure.
    pub fn is_remote_init(&self) -> bool {
        matches!(self, Error::RemoteInit { .. })
    }

    /// Returns true if this error is a failed chat turn.
    pub fn is_remote_call_failed(&self) -> bool {
        matches!(self, Error::RemoteCallFailed { .. })
    }

    /// Returns true if this error is a failed model listing.
    pub fn is_model_list(&self) -> bool {
        matches!(self, Error::ModelList { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::RemoteCallFailed {
                source: Some(source),
                ..
            }
            | Error::ModelList {
                source: Some(source),
                ..
            } => source.status_code(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HistoryLoad { message, .. } => {
                write!(f, "Error loading chat history: {message}")
            }
            Error::RemoteInit { message } => {
                write!(f, "Error initializing Gemini: {message}")
            }
            // The wrapped error already carries its own prefix.
            Error::RemoteCallFailed { message, .. } => write!(f, "{message}"),
            Error::ModelList { message, .. } => {
                write!(f, "Error listing models: {message}")
            }
            Error::Api {
                status_code,
                status,
                message,
            } => {
                if let Some(status) = status {
                    write!(f, "{status} ({status_code}): {message}")
                } else {
                    write!(f, "API error ({status_code}): {message}")
                }
            }
            Error::Authentication { message } => {
                write!(f, "Authentication error: {message}")
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Interrupted { message } => {
                write!(f, "Interrupted: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::HistoryLoad { source, .. }
            | Error::Connection { source, .. }
            | Error::HttpClient { source, .. }
            | Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::RemoteCallFailed { source, .. } | Error::ModelList { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for gemini-chat operations.
pub type Result<T> = std::result::Result<T, Error>;
