//! Chat session controller
//!
//! [`ChatSession`] owns the client-side state of the chat UI: which chat
//! is current, its messages, the sidebar's chat list, the composer, and
//! the pending flags that disable the composer and the new-chat action.
//!
//! Every operation is wrapped here: API failures are logged and turned
//! into a destructive notification, and the state is left as it was
//! before the operation. Nothing returns an error to the caller.
//!
//! State sits behind a `std::sync::Mutex` that is only held between
//! awaits, never across one.

pub mod composer;
pub mod send_flow;

pub use composer::{Attachment, Composer};
pub use send_flow::SendFlow;

use crate::api::{Chat, ChatApi, Message, MessageExchange, SendMessageRequest, DEFAULT_CHAT_TITLE};
use crate::config::ComposerConfig;
use crate::error::Result;
use crate::notify::{Notification, Notifier};
use crate::preferences::Settings;

use futures::future::join_all;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mutable state behind the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Id of the current chat; `None` means the empty "start a chat" view
    pub current_chat: Option<String>,
    /// Messages of the current chat, oldest first
    pub messages: Vec<Message>,
    /// Sidebar list, in backend order
    pub chats: Vec<Chat>,
    /// A send is outstanding (drives the typing indicator)
    pub sending: bool,
    /// A create is outstanding
    pub creating: bool,
    pub composer: Composer,
}

impl SessionState {
    pub fn current(&self) -> Option<&Chat> {
        let id = self.current_chat.as_deref()?;
        self.chats.iter().find(|c| c.id == id)
    }

    /// Drop the current chat, keeping id and messages consistent
    fn clear_current(&mut self) {
        self.current_chat = None;
        self.messages.clear();
    }
}

/// What happened to a send request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The exchange was stored by the backend
    Sent(MessageExchange),
    /// Another send is still outstanding; nothing was requested
    Busy,
    /// The composer holds only whitespace; nothing was requested
    Empty,
    /// The request failed; the composer was restored
    Failed,
}

/// Result of deleting every chat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Controller for one interactive chat session
pub struct ChatSession {
    api: Arc<dyn ChatApi>,
    notifier: Arc<dyn Notifier>,
    settings: Arc<Settings>,
    limits: ComposerConfig,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// Create a session with empty state
    ///
    /// # Arguments
    ///
    /// * `api` - Backend the session talks to
    /// * `notifier` - Receives success and failure notifications
    /// * `settings` - Preferences; the selected model is read on each send
    /// * `limits` - Attachment staging limits
    pub fn new(
        api: Arc<dyn ChatApi>,
        notifier: Arc<dyn Notifier>,
        settings: Arc<Settings>,
        limits: ComposerConfig,
    ) -> Self {
        Self {
            api,
            notifier,
            settings,
            limits,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn current_chat_id(&self) -> Option<String> {
        self.lock().current_chat.clone()
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.lock().chats.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Fetch the chat list and replace the sidebar with it
    ///
    /// Returns `None` (and notifies) on failure; the previous list is kept.
    pub async fn load_chats(&self) -> Option<Vec<Chat>> {
        match self.api.list_chats().await {
            Ok(chats) => {
                tracing::debug!("Loaded {} chats", chats.len());
                self.lock().chats = chats.clone();
                Some(chats)
            }
            Err(e) => {
                self.report("Failed to load chats", &e);
                None
            }
        }
    }

    /// Create a chat titled "New Chat" and make it current
    ///
    /// A second call while a create is outstanding does nothing.
    pub async fn create_chat(&self) -> Option<Chat> {
        {
            let mut state = self.lock();
            if state.creating {
                tracing::debug!("Create already in progress");
                return None;
            }
            state.creating = true;
        }

        let result = self.api.create_chat(DEFAULT_CHAT_TITLE).await;
        self.lock().creating = false;

        match result {
            Ok(chat) => {
                tracing::info!("Started chat {}", chat.id);
                self.adopt_chat(&chat);
                self.notifier.notify(Notification::info(
                    "New chat started",
                    "Ready for your questions!",
                ));
                self.refresh_chats().await;
                Some(chat)
            }
            Err(e) => {
                self.report("Failed to create chat", &e);
                None
            }
        }
    }

    /// Make `chat_id` current and replace the message list with its messages
    ///
    /// On failure the previous chat and messages stay as they were.
    pub async fn select_chat(&self, chat_id: &str) -> Option<Vec<Message>> {
        match self.api.list_messages(chat_id).await {
            Ok(messages) => {
                let mut state = self.lock();
                state.current_chat = Some(chat_id.to_string());
                state.messages = messages.clone();
                tracing::debug!("Selected chat {} ({} messages)", chat_id, messages.len());
                Some(messages)
            }
            Err(e) => {
                self.report("Failed to load messages", &e);
                None
            }
        }
    }

    /// Delete one chat
    ///
    /// If it was current, the current id and the message list are cleared
    /// together.
    pub async fn delete_chat(&self, chat_id: &str) -> bool {
        if let Err(e) = self.api.delete_chat(chat_id).await {
            self.report("Failed to delete chat", &e);
            return false;
        }

        {
            let mut state = self.lock();
            state.chats.retain(|c| c.id != chat_id);
            if state.current_chat.as_deref() == Some(chat_id) {
                state.clear_current();
            }
        }
        tracing::info!("Deleted chat {}", chat_id);
        self.refresh_chats().await;
        true
    }

    /// Delete every chat in the sidebar, concurrently
    ///
    /// Only chats whose delete succeeded are removed locally. Failures are
    /// reported in a single notification, and the list is re-fetched
    /// afterwards to reconcile with the backend.
    pub async fn delete_all_chats(&self) -> BulkDeleteReport {
        let ids: Vec<String> = self.lock().chats.iter().map(|c| c.id.clone()).collect();
        if ids.is_empty() {
            return BulkDeleteReport::default();
        }

        let api = &self.api;
        let results = join_all(ids.iter().map(|id| async move {
            let result = api.delete_chat(id).await;
            (id.clone(), result)
        }))
        .await;

        let mut report = BulkDeleteReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.deleted.push(id),
                Err(e) => {
                    tracing::error!("Failed to delete chat {}: {:#}", id, e);
                    report.failed.push(id);
                }
            }
        }

        {
            let mut state = self.lock();
            state.chats.retain(|c| !report.deleted.contains(&c.id));
            let current_deleted = state
                .current_chat
                .as_ref()
                .is_some_and(|id| report.deleted.contains(id));
            if current_deleted {
                state.clear_current();
            }
        }

        if report.failed.is_empty() {
            self.notifier.notify(Notification::info(
                "All chats cleared",
                format!("Deleted {} chats", report.deleted.len()),
            ));
        } else {
            self.notifier.notify(Notification::error(
                "Some chats could not be deleted",
                format!(
                    "{} of {} deletes failed",
                    report.failed.len(),
                    report.failed.len() + report.deleted.len()
                ),
            ));
        }

        self.refresh_chats().await;
        report
    }

    /// Rename a chat; blank titles are ignored
    pub async fn rename_chat(&self, chat_id: &str, title: &str) -> Option<Chat> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        match self.api.update_chat(chat_id, title).await {
            Ok(updated) => {
                {
                    let mut state = self.lock();
                    if let Some(entry) = state.chats.iter_mut().find(|c| c.id == chat_id) {
                        entry.title = updated.title.clone();
                    }
                }
                tracing::info!("Renamed chat {} to {:?}", chat_id, updated.title);
                self.refresh_chats().await;
                Some(updated)
            }
            Err(e) => {
                self.report("Failed to rename chat", &e);
                None
            }
        }
    }

    /// Replace the composer text
    pub fn set_draft(&self, text: impl Into<String>) {
        self.lock().composer.set_draft(text);
    }

    /// Validate and stage a file for the next message
    ///
    /// # Errors
    ///
    /// Returns the validation failure; nothing is staged in that case
    pub fn stage_attachment(&self, path: &Path) -> Result<Attachment> {
        let mut state = self.lock();
        let staged = state.composer.stage(path, &self.limits).cloned();
        staged
    }

    pub fn unstage_attachment(&self, index: usize) -> Option<Attachment> {
        self.lock().composer.unstage(index)
    }

    pub fn clear_attachments(&self) {
        self.lock().composer.clear_attachments();
    }

    /// Send the composer's text to the current chat
    ///
    /// With no current chat, a chat is created first. The composer is
    /// cleared while the request is outstanding and restored if it fails.
    pub async fn send_message(&self) -> SendOutcome {
        let (text, attachments, current) = {
            let mut state = self.lock();
            if state.sending {
                tracing::debug!("Send ignored: another send is pending");
                return SendOutcome::Busy;
            }
            if !state.composer.has_text() {
                return SendOutcome::Empty;
            }
            if state.creating && state.current_chat.is_none() {
                tracing::debug!("Send ignored: a chat is still being created");
                return SendOutcome::Busy;
            }
            state.sending = true;
            let (text, attachments) = state.composer.take();
            (text, attachments, state.current_chat.clone())
        };

        let request = SendMessageRequest {
            message: text.trim().to_string(),
            session_id: None,
            model: Some(self.settings.selected_model()),
        };
        if !attachments.is_empty() {
            tracing::debug!(
                "{} staged attachments are not uploaded",
                attachments.len()
            );
        }

        match self.run_send_flow(current, &request).await {
            Ok((chat_id, exchange)) => {
                {
                    let mut state = self.lock();
                    state.sending = false;
                    if state.current_chat.as_deref() == Some(chat_id.as_str()) {
                        state.messages.push(exchange.user_message.clone());
                        state.messages.push(exchange.ai_response.clone());
                    } else {
                        tracing::debug!("Reply for {} arrived after switching chats", chat_id);
                    }
                }
                self.refresh_chats().await;
                SendOutcome::Sent(exchange)
            }
            Err(e) => {
                {
                    let mut state = self.lock();
                    state.sending = false;
                    state.composer.restore(text, attachments);
                }
                self.report("Failed to send message", &e);
                SendOutcome::Failed
            }
        }
    }

    async fn run_send_flow(
        &self,
        current: Option<String>,
        request: &SendMessageRequest,
    ) -> Result<(String, MessageExchange)> {
        let mut flow = SendFlow::begin(current);
        while !flow.is_complete() {
            // The implicit create holds the same guard as an explicit one.
            let creates = flow == SendFlow::NoChat;
            if creates {
                self.lock().creating = true;
            }
            let step = flow.advance(self.api.as_ref(), request).await;
            if creates {
                self.lock().creating = false;
            }
            flow = step?;
            if let Some(chat) = flow.created_chat() {
                self.adopt_chat(chat);
            }
        }
        flow.into_exchange()
    }

    /// Make a freshly created chat current with an empty message list
    fn adopt_chat(&self, chat: &Chat) {
        let mut state = self.lock();
        state.current_chat = Some(chat.id.clone());
        state.messages.clear();
        if !state.chats.iter().any(|c| c.id == chat.id) {
            state.chats.insert(0, chat.clone());
        }
    }

    /// Re-fetch the list after a mutation; failures only log
    async fn refresh_chats(&self) {
        match self.api.list_chats().await {
            Ok(chats) => self.lock().chats = chats,
            Err(e) => tracing::warn!("Failed to refresh chat list: {:#}", e),
        }
    }

    fn report(&self, title: &str, error: &anyhow::Error) {
        tracing::error!("{}: {:#}", title, error);
        self.notifier
            .notify(Notification::error(title, error.to_string()));
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
