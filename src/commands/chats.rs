//! One-shot conversation management (`chatterm chats ...`)

use crate::api::Chat;
use crate::cli::ChatsCommand;
use crate::commands::confirm;
use crate::error::{ChattermError, Result};
use crate::session::ChatSession;
use crate::view::{self, sidebar};
use colored::Colorize;

/// Handle chats commands
///
/// Failures have already been reported through the session's notifier;
/// the returned error only carries the exit status.
pub async fn handle_chats(session: &ChatSession, command: ChatsCommand) -> Result<()> {
    let chats = session
        .load_chats()
        .await
        .ok_or_else(|| ChattermError::Command("Could not load chats".into()))?;

    match command {
        ChatsCommand::List => {
            if chats.is_empty() {
                println!("{}", "No chats found.".yellow());
                return Ok(());
            }

            println!("\nChats:");
            sidebar::chats_table(&chats, None).printstd();
            println!();
            println!(
                "Use {} to continue one.",
                "chatterm chat --chat <#|ID>".cyan()
            );
            println!();
        }
        ChatsCommand::Show { id } => {
            let chat = find(&chats, &id)?;
            let messages = session
                .select_chat(&chat.id)
                .await
                .ok_or_else(|| ChattermError::Command("Could not load messages".into()))?;

            let prefs = session.settings();
            println!("{}\n", format!("── {} ──", chat.title).bold());
            println!(
                "{}",
                view::render_messages(&messages, &prefs.palette(), prefs.show_timestamps())
            );
        }
        ChatsCommand::Delete { id, yes } => {
            let chat = find(&chats, &id)?;
            if !yes && !confirm(&format!("Delete chat \"{}\"?", chat.title))? {
                println!("Cancelled.");
                return Ok(());
            }
            if !session.delete_chat(&chat.id).await {
                return Err(ChattermError::Command("Delete failed".into()).into());
            }
            println!("{}", format!("Deleted chat {}", chat.id).green());
        }
        ChatsCommand::DeleteAll { yes } => {
            if chats.is_empty() {
                println!("{}", "No chats to delete.".yellow());
                return Ok(());
            }
            let question = format!(
                "Delete all {} chats? This action cannot be undone.",
                chats.len()
            );
            if !yes && !confirm(&question)? {
                println!("Cancelled.");
                return Ok(());
            }
            let report = session.delete_all_chats().await;
            if !report.is_complete() {
                return Err(ChattermError::Command(format!(
                    "{} chats could not be deleted: {}",
                    report.failed.len(),
                    report.failed.join(", ")
                ))
                .into());
            }
        }
        ChatsCommand::Rename { id, title } => {
            let chat = find(&chats, &id)?;
            if title.trim().is_empty() {
                return Err(ChattermError::Command("Title cannot be empty".into()).into());
            }
            let renamed = session
                .rename_chat(&chat.id, &title)
                .await
                .ok_or_else(|| ChattermError::Command("Rename failed".into()))?;
            println!("{}", format!("Renamed to \"{}\"", renamed.title).green());
        }
        ChatsCommand::New => {
            let chat = session
                .create_chat()
                .await
                .ok_or_else(|| ChattermError::Command("Could not create chat".into()))?;
            println!("{}", chat.id.cyan());
        }
    }

    Ok(())
}

fn find(chats: &[Chat], reference: &str) -> Result<Chat> {
    sidebar::resolve_chat(chats, reference)
        .cloned()
        .ok_or_else(|| ChattermError::Command(format!("No chat matches \"{}\"", reference)).into())
}
