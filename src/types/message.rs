use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who wrote a transcript message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

/// One persisted turn of conversation.
///
/// Serialized as `{"role": ..., "content": ..., "timestamp": ...}` with the
/// timestamp in RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: MessageRole,

    /// The message text.
    pub content: String,

    /// When the message was created.  Entries saved without one read as the
    /// time they were loaded.
    #[serde(with = "crate::utils::time", default = "OffsetDateTime::now_utc")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    /// Create a new `Message` stamped with the given time.
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a new user message stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, OffsetDateTime::now_utc())
    }

    /// Create a new assistant message stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn message_serialization() {
        let message = Message::new(
            MessageRole::Assistant,
            "hi there",
            datetime!(2024-05-01 12:30:00.5 UTC),
        );
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "assistant",
                "content": "hi there",
                "timestamp": "2024-05-01T12:30:00.5Z"
            })
        );
    }

    #[test]
    fn message_deserialization_accepts_naive_timestamps() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "role": "user",
            "content": "hello",
            "timestamp": "2024-05-01T12:30:00.123456"
        }))
        .unwrap();
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.content, "hello");
        assert_eq!(message.timestamp, datetime!(2024-05-01 12:30:00.123456 UTC));
    }

    #[test]
    fn missing_timestamp_reads_as_now() {
        let before = OffsetDateTime::now_utc();
        let message: Message = serde_json::from_value(serde_json::json!({
            "role": "assistant",
            "content": "old answer"
        }))
        .unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "old answer");
        assert!(message.timestamp >= before);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_value::<Message>(serde_json::json!({
            "role": "system",
            "content": "x",
            "timestamp": "2024-05-01T12:30:00Z"
        }));
        assert!(result.is_err());
    }
}
