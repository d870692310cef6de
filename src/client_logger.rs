//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`](crate::Gemini)
//! client, and [`JsonLinesLogger`], which appends every interaction to a file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model, ModelListResponse};

/// A trait for logging Gemini client operations.
///
/// Implement this trait to capture and record all API interactions.  Loggers
/// are called inline on the request path and must not fail; implementations
/// swallow their own I/O errors.
pub trait ClientLogger: Send + Sync {
    /// Log an outgoing `generateContent` request.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a successful `generateContent` response.
    fn log_response(&self, model: &Model, response: &GenerateContentResponse);

    /// Log one page of a model listing.
    fn log_model_page(&self, page: &ModelListResponse) {
        _ = page;
    }

    /// Log a failed call.  `operation` names the endpoint.
    fn log_error(&self, operation: &str, error: &Error);
}

/// Appends one JSON object per interaction to a file.
///
/// Each line has the shape `{"timestamp": ..., "event": ..., ...}`.
pub struct JsonLinesLogger {
    file: Mutex<File>,
}

impl JsonLinesLogger {
    /// Opens (creating if needed) the log file for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|err| Error::io("failed to open client log", err))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn write_event(&self, event: &str, mut fields: Value) {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        if let Value::Object(map) = &mut fields {
            map.insert("timestamp".to_string(), Value::String(timestamp));
            map.insert("event".to_string(), Value::String(event.to_string()));
        }
        let Ok(line) = serde_json::to_string(&fields) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        self.write_event(
            "request",
            json!({"model": model.id(), "body": request}),
        );
    }

    fn log_response(&self, model: &Model, response: &GenerateContentResponse) {
        self.write_event(
            "response",
            json!({"model": model.id(), "body": response}),
        );
    }

    fn log_model_page(&self, page: &ModelListResponse) {
        self.write_event(
            "model_page",
            json!({"count": page.models.len(), "has_more": page.has_more()}),
        );
    }

    fn log_error(&self, operation: &str, error: &Error) {
        self.write_event(
            "error",
            json!({"operation": operation, "message": error.to_string()}),
        );
    }
}
