use serde::{Deserialize, Serialize};

use crate::types::{Message, MessageRole};

/// Role of a turn as the Gemini API names it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// Text written by the user.
    User,

    /// Text produced by the model.
    Model,
}

impl From<MessageRole> for ContentRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => ContentRole::User,
            MessageRole::Assistant => ContentRole::Model,
        }
    }
}

/// A single part of a content turn.
///
/// Only text parts are produced by this crate; parts of other kinds in a
/// response deserialize with `text` unset and are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text of the part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// One turn of a Gemini conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Content {
    /// Author of the turn; omitted by the API for some system-level content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,

    /// Ordered parts of the turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Creates a content turn holding a single text part.
    pub fn new(role: ContentRole, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part::text(text)],
        }
    }

    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ContentRole::User, text)
    }

    /// Creates a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ContentRole::Model, text)
    }

    /// Concatenates the text of every text part.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        Content::new(message.role.into(), message.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_serialization() {
        let content = Content::model("hi there");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "model", "parts": [{"text": "hi there"}]})
        );
    }

    #[test]
    fn content_text_skips_non_text_parts() {
        let content: Content = serde_json::from_value(serde_json::json!({
            "role": "model",
            "parts": [
                {"text": "Hello, "},
                {"functionCall": {"name": "noop", "args": {}}},
                {"text": "world"}
            ]
        }))
        .unwrap();
        assert_eq!(content.text(), "Hello, world");
    }

    #[test]
    fn message_roles_map_to_content_roles() {
        let user = Message::user("q");
        let assistant = Message::assistant("a");
        assert_eq!(Content::from(&user).role, Some(ContentRole::User));
        assert_eq!(Content::from(&assistant).role, Some(ContentRole::Model));
        assert_eq!(Content::from(&assistant).text(), "a");
    }
}
