use serde::{Deserialize, Serialize};

use crate::types::Content;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    /// The conversation so far, ending with the turn to answer.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Create a new request from the given contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self { contents }
    }
}

/// One candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when the candidate was filtered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped (`STOP`, `MAX_TOKENS`, `SAFETY`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Total tokens billed.
    #[serde(default)]
    pub total_token_count: u64,
}

/// Response body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if it produced any.
    pub fn text(&self) -> Option<String> {
        let text = self.candidates.first()?.content.as_ref()?.text();
        if text.is_empty() { None } else { Some(text) }
    }

    /// A human-readable reason for the absence of text.
    pub fn missing_text_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return format!("prompt was blocked ({reason})");
        }
        match self
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            Some(reason) => format!("response contained no text (finish reason: {reason})"),
            None => "response contained no candidates".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let request = GenerateContentRequest::new(vec![
            Content::user("hello"),
            Content::model("hi there"),
            Content::user("how are you?"),
        ]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "hello"}]},
                    {"role": "model", "parts": [{"text": "hi there"}]},
                    {"role": "user", "parts": [{"text": "how are you?"}]}
                ]
            })
        );
    }

    #[test]
    fn response_text() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hi "}, {"text": "there"}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5},
            "modelVersion": "gemini-1.5-flash"
        }))
        .unwrap();
        assert_eq!(response.text(), Some("hi there".to_string()));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 5);
    }

    #[test]
    fn blocked_prompt_has_reason() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.missing_text_reason(), "prompt was blocked (SAFETY)");
    }

    #[test]
    fn filtered_candidate_has_reason() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(
            response.missing_text_reason(),
            "response contained no text (finish reason: SAFETY)"
        );
        assert_eq!(
            GenerateContentResponse::default().missing_text_reason(),
            "response contained no candidates"
        );
    }
}
