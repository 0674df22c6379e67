//! Backend API abstraction
//!
//! The chat backend is an external collaborator reached over a small REST
//! contract rooted at `/api`. The [`ChatApi`] trait is the seam the session
//! controller talks to; [`HttpChatApi`] is the reqwest implementation.

pub mod client;
pub mod types;

pub use client::HttpChatApi;
pub use types::{
    Chat, CreateChatRequest, Message, MessageExchange, SendMessageRequest, Sender,
    UpdateChatRequest, DEFAULT_CHAT_TITLE,
};

use crate::error::Result;
use async_trait::async_trait;

/// Chat and message operations offered by the backend
///
/// Every method is a single HTTP round trip. Implementations return an
/// error for transport failures and non-2xx responses alike.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `GET /chats`, in backend order
    async fn list_chats(&self) -> Result<Vec<Chat>>;

    /// `POST /chats`
    async fn create_chat(&self, title: &str) -> Result<Chat>;

    /// `GET /chats/{id}`
    async fn get_chat(&self, chat_id: &str) -> Result<Chat>;

    /// `PUT /chats/{id}`
    async fn update_chat(&self, chat_id: &str, title: &str) -> Result<Chat>;

    /// `DELETE /chats/{id}`
    async fn delete_chat(&self, chat_id: &str) -> Result<()>;

    /// `GET /chats/{id}/messages`, oldest first
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>>;

    /// `POST /chats/{id}/messages`
    ///
    /// The backend stores the user message, asks the model for a reply,
    /// and returns both.
    async fn send_message(
        &self,
        chat_id: &str,
        request: &SendMessageRequest,
    ) -> Result<MessageExchange>;
}
