//! Chat transcript messages.
//!
//! Constructors take the timestamp explicitly; callers own the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;
use crate::model::Provider;

pub const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One transcript entry. Append-only per session; timestamps serialize as
/// ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Base64 image the user attached, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_preview: Option<String>,
    /// Provider that produced an AI reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    /// Model that produced an AI reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>, image_preview: Option<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::fresh(),
            text: text.into(),
            sender: Sender::User,
            timestamp,
            image_preview,
            provider: None,
            model: None,
        }
    }

    #[must_use]
    pub fn ai(
        text: impl Into<String>,
        provider: Provider,
        model: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::fresh(),
            text: text.into(),
            sender: Sender::Ai,
            timestamp,
            image_preview: None,
            provider: Some(provider),
            model: Some(model.into()),
        }
    }

    /// An error surfaced inline in the transcript, labeled `Error: `.
    #[must_use]
    pub fn error(detail: impl AsRef<str>, provider: Provider, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::fresh(),
            text: format!("{ERROR_PREFIX}{}", detail.as_ref()),
            sender: Sender::Ai,
            timestamp,
            image_preview: None,
            provider: Some(provider),
            model: None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.sender == Sender::Ai && self.text.starts_with(ERROR_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_labeled() {
        let msg = Message::error("kunci tidak valid", Provider::Gemini, Utc::now());
        assert!(msg.is_error());
        assert_eq!(msg.text, "Error: kunci tidak valid");
        assert_eq!(msg.sender, Sender::Ai);
        assert_eq!(msg.model, None);
    }

    #[test]
    fn wire_format_uses_camel_case_and_iso_timestamps() {
        let msg = Message::user("halo", Some("aGFsbw==".into()), Utc::now());
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("imagePreview").is_some());
        let stamp = json["timestamp"].as_str().unwrap();
        assert!(stamp.contains('T'), "expected ISO-8601, got {stamp}");
    }

    #[test]
    fn roundtrip_preserves_ai_metadata() {
        let msg = Message::ai("jawaban", Provider::OpenRouter, "openrouter/auto", Utc::now());
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
