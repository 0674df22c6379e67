//! chatterm - terminal chat client library
//!
//! This library provides the core of a ChatGPT-style chat client that talks
//! to a conversation backend over REST: conversation lifecycle, the message
//! composer, user preferences, and terminal rendering.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Wire types and the REST client for the conversation backend
//! - `session`: Conversation state, composer, and the send workflow
//! - `preferences`: Theme, model, and display preferences with persistence
//! - `profile`: Account, usage, and billing summaries
//! - `notify`: Transient user-facing notifications
//! - `view`: Terminal rendering of chats, messages, and panels
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chatterm::{commands, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let settings = commands::open_settings(&config)?;
//!     let session = commands::build_session(&config, settings)?;
//!     if let Some(chats) = session.load_chats().await {
//!         println!("{} chats", chats.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod preferences;
pub mod profile;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use api::{Chat, ChatApi, HttpChatApi, Message, Sender};
pub use config::Config;
pub use error::{ChattermError, Result};
pub use notify::{Notification, Notifier, TerminalNotifier};
pub use preferences::{Preferences, Settings, Theme};
pub use session::{ChatSession, SendOutcome};

#[cfg(test)]
pub mod test_utils;
