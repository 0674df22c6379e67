//! Wire types for the chat backend
//!
//! Field names follow the backend's camelCase JSON. Fields that only some
//! endpoints return are defaulted so one `Chat` type covers the list,
//! create, get, and update responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to chats created from the client
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// A conversation thread as listed in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Backend-assigned identifier
    pub id: String,
    /// Display title (the backend may rewrite it after the first exchange)
    pub title: String,
    /// Snippet of the latest message; empty for a fresh chat
    #[serde(default)]
    pub preview: String,
    /// Human-readable last-activity time, e.g. "2 hours ago"
    #[serde(default)]
    pub timestamp: String,
    /// Number of stored messages
    #[serde(default)]
    pub message_count: u32,
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

/// One turn in a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Display time as formatted by the backend, e.g. "03:04 PM"
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Body of `POST /chats`
#[derive(Debug, Clone, Serialize)]
pub struct CreateChatRequest {
    pub title: String,
}

/// Body of `PUT /chats/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateChatRequest {
    pub title: String,
}

/// Body of `POST /chats/{id}/messages`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Model identifier selected in the preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Response of `POST /chats/{id}/messages`: the stored user message and
/// the AI reply, in that order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageExchange {
    pub user_message: Message,
    pub ai_response: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_from_list_response() {
        let json = r#"{
            "id": "c1",
            "title": "Coding Poetry",
            "preview": "Can you help me write a poem?",
            "timestamp": "2 hours ago",
            "messageCount": 4
        }"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.id, "c1");
        assert_eq!(chat.preview, "Can you help me write a poem?");
        assert_eq!(chat.timestamp, "2 hours ago");
        assert_eq!(chat.message_count, 4);
    }

    #[test]
    fn test_chat_from_create_response_defaults_missing_fields() {
        let json = r#"{
            "id": "c2",
            "title": "New Chat",
            "createdAt": "2025-01-01T10:00:00.000000",
            "updatedAt": "2025-01-01T10:00:00.000000",
            "messageCount": 0
        }"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.title, "New Chat");
        assert!(chat.preview.is_empty());
        assert!(chat.timestamp.is_empty());
        assert_eq!(chat.message_count, 0);
    }

    #[test]
    fn test_chat_from_get_response_ignores_embedded_messages() {
        let json = r#"{"id": "c3", "title": "T", "messages": [{"id": "m"}]}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.id, "c3");
    }

    #[test]
    fn test_message_sender_parsing() {
        let json = r#"{"id": "m1", "text": "hi", "sender": "ai", "timestamp": "10:30 AM", "chatId": "c1"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.sender, Sender::Ai);
        assert_eq!(message.chat_id.as_deref(), Some("c1"));

        let bad = r#"{"id": "m1", "text": "hi", "sender": "robot"}"#;
        assert!(serde_json::from_str::<Message>(bad).is_err());
    }

    #[test]
    fn test_send_request_omits_absent_optionals() {
        let request = SendMessageRequest {
            message: "hello".to_string(),
            session_id: None,
            model: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"message": "hello"}));

        let request = SendMessageRequest {
            message: "hello".to_string(),
            session_id: Some("s1".to_string()),
            model: Some("gpt-4o".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sessionId"], "s1");
        assert_eq!(value["model"], "gpt-4o");
    }

    #[test]
    fn test_exchange_parsing() {
        let json = r#"{
            "userMessage": {"id": "u", "text": "q", "sender": "user", "timestamp": "01:00 PM", "chatId": "c"},
            "aiResponse": {"id": "a", "text": "r", "sender": "ai", "timestamp": "01:00 PM", "chatId": "c"}
        }"#;
        let exchange: MessageExchange = serde_json::from_str(json).unwrap();
        assert_eq!(exchange.user_message.sender, Sender::User);
        assert_eq!(exchange.ai_response.text, "r");
    }
}
