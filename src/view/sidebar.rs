//! Chat list rendering and lookup

use super::truncate;
use crate::api::Chat;
use crate::preferences::Palette;
use colored::Colorize;
use prettytable::{format, Table};

/// Preview shown for a chat without messages
pub const EMPTY_PREVIEW: &str = "Start a conversation...";
/// Timestamp shown when the backend did not send one
pub const EMPTY_TIMESTAMP: &str = "now";

pub fn preview_or_fallback(chat: &Chat) -> &str {
    if chat.preview.trim().is_empty() {
        EMPTY_PREVIEW
    } else {
        &chat.preview
    }
}

pub fn timestamp_or_fallback(chat: &Chat) -> &str {
    if chat.timestamp.trim().is_empty() {
        EMPTY_TIMESTAMP
    } else {
        &chat.timestamp
    }
}

/// Compact sidebar listing, current chat marked with `▸`
pub fn render_sidebar(chats: &[Chat], current: Option<&str>, palette: &Palette) -> String {
    if chats.is_empty() {
        return palette.muted("No chats yet. Type a message or /new to start one.").to_string();
    }

    chats
        .iter()
        .enumerate()
        .map(|(i, chat)| {
            let is_current = current == Some(chat.id.as_str());
            let marker = if is_current { "▸" } else { " " };
            let title = if is_current {
                palette.accent(&truncate(&chat.title, 40)).to_string()
            } else {
                truncate(&chat.title, 40)
            };
            format!(
                "{} {:>2}. {}  {}\n       {}",
                marker,
                i + 1,
                title,
                palette.muted(timestamp_or_fallback(chat)),
                palette.muted(&truncate(preview_or_fallback(chat), 60))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table form of the chat list for `chats list`
pub fn chats_table(chats: &[Chat], current: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "#".bold(),
        "ID".bold(),
        "Title".bold(),
        "Preview".bold(),
        "Messages".bold(),
        "Updated".bold()
    ]);

    for (i, chat) in chats.iter().enumerate() {
        let index = if current == Some(chat.id.as_str()) {
            format!("{}*", i + 1)
        } else {
            (i + 1).to_string()
        };
        table.add_row(prettytable::row![
            index,
            chat.id.cyan(),
            truncate(&chat.title, 40),
            truncate(preview_or_fallback(chat), 40),
            chat.message_count,
            timestamp_or_fallback(chat)
        ]);
    }

    table
}

/// Find a chat by 1-based index, exact id, or unique id prefix
///
/// # Examples
///
/// ```
/// use chatterm::api::Chat;
/// use chatterm::view::sidebar::resolve_chat;
///
/// let chats = vec![Chat {
///     id: "a1b2".into(),
///     title: "Poems".into(),
///     preview: String::new(),
///     timestamp: String::new(),
///     message_count: 0,
/// }];
/// assert_eq!(resolve_chat(&chats, "1").map(|c| c.id.as_str()), Some("a1b2"));
/// assert_eq!(resolve_chat(&chats, "a1").map(|c| c.id.as_str()), Some("a1b2"));
/// assert!(resolve_chat(&chats, "zz").is_none());
/// ```
pub fn resolve_chat<'a>(chats: &'a [Chat], reference: &str) -> Option<&'a Chat> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Ok(index) = reference.parse::<usize>() {
        if index >= 1 && index <= chats.len() {
            return Some(&chats[index - 1]);
        }
    }

    if let Some(chat) = chats.iter().find(|c| c.id == reference) {
        return Some(chat);
    }

    let mut matches = chats.iter().filter(|c| c.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(chat), None) => Some(chat),
        _ => None,
    }
}
