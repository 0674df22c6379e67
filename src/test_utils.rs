//! Test utilities for chatterm
//!
//! Provides an in-memory [`FakeChatApi`] with failure injection and a call
//! log, a [`RecordingNotifier`], and temporary file helpers.

use crate::api::{
    Chat, ChatApi, Message, MessageExchange, SendMessageRequest, Sender,
};
use crate::error::{ChattermError, Result};
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Panics
///
/// Panics if the directory cannot be created
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

#[derive(Debug, Default)]
struct FakeState {
    chats: Vec<Chat>,
    messages: Vec<(String, Message)>,
    next_id: u64,
    calls: Vec<String>,
    failing: HashSet<String>,
    failing_for: HashSet<(String, String)>,
    send_delay: Option<Duration>,
    create_delay: Option<Duration>,
    last_send: Option<SendMessageRequest>,
}

/// In-memory backend implementing [`ChatApi`]
///
/// Every trait call is recorded as `"operation"` or `"operation:chat_id"`,
/// including calls that were made to fail.
#[derive(Debug, Default)]
pub struct FakeChatApi {
    state: Mutex<FakeState>,
}

impl FakeChatApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chat with alternating user/ai messages, without logging a call
    pub fn seed_chat(&self, title: &str, texts: &[&str]) -> Chat {
        let mut state = self.lock();
        let chat = Self::new_chat(&mut state, title);
        for (i, text) in texts.iter().enumerate() {
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
            let message = Self::new_message(&mut state, &chat.id, text, sender);
            state.messages.push((chat.id.clone(), message));
        }
        let chat = Chat {
            message_count: texts.len() as u32,
            preview: texts.last().map(|t| t.to_string()).unwrap_or_default(),
            ..chat
        };
        state.chats.push(chat.clone());
        chat
    }

    /// Make every call to `operation` fail
    pub fn fail(&self, operation: &str) {
        self.lock().failing.insert(operation.to_string());
    }

    /// Make `operation` fail only for `chat_id`
    pub fn fail_for(&self, operation: &str, chat_id: &str) {
        self.lock()
            .failing_for
            .insert((operation.to_string(), chat_id.to_string()));
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failing.clear();
        state.failing_for.clear();
    }

    /// Delay every `send_message` call
    pub fn set_send_delay(&self, delay: Duration) {
        self.lock().send_delay = Some(delay);
    }

    /// Delay every `create_chat` call
    pub fn set_create_delay(&self, delay: Duration) {
        self.lock().create_delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn last_send_request(&self) -> Option<SendMessageRequest> {
        self.lock().last_send.clone()
    }

    pub fn chat_ids(&self) -> Vec<String> {
        self.lock().chats.iter().map(|c| c.id.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake api state poisoned")
    }

    fn record(&self, operation: &str, chat_id: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(match chat_id {
            Some(id) => format!("{}:{}", operation, id),
            None => operation.to_string(),
        });
        let failing = state.failing.contains(operation)
            || chat_id.is_some_and(|id| {
                state
                    .failing_for
                    .contains(&(operation.to_string(), id.to_string()))
            });
        if failing {
            return Err(ChattermError::Api {
                status: 500,
                message: format!("{} failed", operation),
            }
            .into());
        }
        Ok(())
    }

    fn new_chat(state: &mut FakeState, title: &str) -> Chat {
        state.next_id += 1;
        Chat {
            id: format!("chat-{}", state.next_id),
            title: title.to_string(),
            preview: String::new(),
            timestamp: "now".to_string(),
            message_count: 0,
        }
    }

    fn new_message(state: &mut FakeState, chat_id: &str, text: &str, sender: Sender) -> Message {
        state.next_id += 1;
        Message {
            id: format!("msg-{}", state.next_id),
            text: text.to_string(),
            sender,
            timestamp: "12:00 PM".to_string(),
            chat_id: Some(chat_id.to_string()),
        }
    }

    fn not_found(chat_id: &str) -> anyhow::Error {
        ChattermError::Api {
            status: 404,
            message: format!("Chat {} not found", chat_id),
        }
        .into()
    }
}

#[async_trait]
impl ChatApi for FakeChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        self.record("list_chats", None)?;
        Ok(self.lock().chats.clone())
    }

    async fn create_chat(&self, title: &str) -> Result<Chat> {
        self.record("create_chat", None)?;
        let delay = self.lock().create_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.lock();
        let chat = Self::new_chat(&mut state, title);
        state.chats.insert(0, chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Chat> {
        self.record("get_chat", Some(chat_id))?;
        self.lock()
            .chats
            .iter()
            .find(|c| c.id == chat_id)
            .cloned()
            .ok_or_else(|| Self::not_found(chat_id))
    }

    async fn update_chat(&self, chat_id: &str, title: &str) -> Result<Chat> {
        self.record("update_chat", Some(chat_id))?;
        let mut state = self.lock();
        let chat = state
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or_else(|| Self::not_found(chat_id))?;
        chat.title = title.to_string();
        Ok(chat.clone())
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<()> {
        self.record("delete_chat", Some(chat_id))?;
        let mut state = self.lock();
        let before = state.chats.len();
        state.chats.retain(|c| c.id != chat_id);
        if state.chats.len() == before {
            return Err(Self::not_found(chat_id));
        }
        state.messages.retain(|(id, _)| id != chat_id);
        Ok(())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        self.record("list_messages", Some(chat_id))?;
        let state = self.lock();
        if !state.chats.iter().any(|c| c.id == chat_id) {
            return Err(Self::not_found(chat_id));
        }
        Ok(state
            .messages
            .iter()
            .filter(|(id, _)| id == chat_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn send_message(
        &self,
        chat_id: &str,
        request: &SendMessageRequest,
    ) -> Result<MessageExchange> {
        self.record("send_message", Some(chat_id))?;
        let delay = {
            let mut state = self.lock();
            state.last_send = Some(request.clone());
            state.send_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if !state.chats.iter().any(|c| c.id == chat_id) {
            return Err(Self::not_found(chat_id));
        }
        let user = Self::new_message(&mut state, chat_id, &request.message, Sender::User);
        let reply = Self::new_message(
            &mut state,
            chat_id,
            &format!("Echo: {}", request.message),
            Sender::Ai,
        );
        state.messages.push((chat_id.to_string(), user.clone()));
        state.messages.push((chat_id.to_string(), reply.clone()));
        if let Some(chat) = state.chats.iter_mut().find(|c| c.id == chat_id) {
            chat.message_count += 2;
            chat.preview = reply.text.clone();
        }

        Ok(MessageExchange {
            user_message: user,
            ai_response: reply,
        })
    }
}

/// Notifier that keeps every notification for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notifier poisoned")
            .clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.all().into_iter().map(|n| n.title).collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.all().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("notifier poisoned")
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_records_and_fails() {
        let api = FakeChatApi::new();
        let chat = api.seed_chat("A", &["hi", "hello"]);

        assert_eq!(api.list_messages(&chat.id).await.unwrap().len(), 2);
        api.fail_for("delete_chat", &chat.id);
        assert!(api.delete_chat(&chat.id).await.is_err());
        api.clear_failures();
        api.delete_chat(&chat.id).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                format!("list_messages:{}", chat.id),
                format!("delete_chat:{}", chat.id),
                format!("delete_chat:{}", chat.id),
            ]
        );
        assert!(api.chat_ids().is_empty());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "a.txt", "abc");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "abc");
    }
}
