//! Create-on-first-send as an explicit state machine
//!
//! A send always runs `NoChat -> ChatCreated -> MessageSent`. When a chat
//! is already selected the flow starts at `ChatCreated`, so the create step
//! happens exactly when there is nothing to send into, and always before
//! the message request.

use crate::api::{Chat, ChatApi, MessageExchange, SendMessageRequest, DEFAULT_CHAT_TITLE};
use crate::error::{ChattermError, Result};

/// Progress of a single send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFlow {
    /// No chat is selected; one must be created first
    NoChat,
    /// A chat exists to send into
    ///
    /// `new_chat` is set only when this flow created it.
    ChatCreated {
        chat_id: String,
        new_chat: Option<Chat>,
    },
    /// The backend stored the message and returned the reply
    MessageSent {
        chat_id: String,
        exchange: MessageExchange,
    },
}

impl SendFlow {
    /// Starting state for the currently selected chat, if any
    pub fn begin(current_chat: Option<String>) -> Self {
        match current_chat {
            Some(chat_id) => Self::ChatCreated {
                chat_id,
                new_chat: None,
            },
            None => Self::NoChat,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::MessageSent { .. })
    }

    /// The chat created by the step that produced this state
    pub fn created_chat(&self) -> Option<&Chat> {
        match self {
            Self::ChatCreated { new_chat, .. } => new_chat.as_ref(),
            _ => None,
        }
    }

    /// Perform one network step
    ///
    /// # Errors
    ///
    /// Returns the API error of the failed step; the flow is consumed and
    /// the caller decides how to recover.
    pub async fn advance(self, api: &dyn ChatApi, request: &SendMessageRequest) -> Result<Self> {
        match self {
            Self::NoChat => {
                let chat = api.create_chat(DEFAULT_CHAT_TITLE).await?;
                tracing::info!("Created chat {} for first message", chat.id);
                Ok(Self::ChatCreated {
                    chat_id: chat.id.clone(),
                    new_chat: Some(chat),
                })
            }
            Self::ChatCreated { chat_id, .. } => {
                let exchange = api.send_message(&chat_id, request).await?;
                Ok(Self::MessageSent { chat_id, exchange })
            }
            done @ Self::MessageSent { .. } => Ok(done),
        }
    }

    /// Chat id and reply of a completed flow
    ///
    /// # Errors
    ///
    /// Returns error if the flow has not reached `MessageSent`
    pub fn into_exchange(self) -> Result<(String, MessageExchange)> {
        match self {
            Self::MessageSent { chat_id, exchange } => Ok((chat_id, exchange)),
            other => Err(ChattermError::Transport(format!(
                "send did not complete (stopped at {:?})",
                other
            ))
            .into()),
        }
    }
}
