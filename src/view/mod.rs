//! Terminal rendering of the chat UI
//!
//! Rendering functions return strings (or prettytable tables) rather than
//! printing, so the command layer decides where output goes and tests can
//! inspect it.

pub mod panels;
pub mod sidebar;

use crate::api::{Message, Sender};
use crate::preferences::Palette;
use crate::session::Attachment;
use colored::Colorize;

/// Shown in the message area when no chat is selected
pub const EMPTY_STATE: &str = "How can I help you today?";

/// Render one message as a labelled bubble
///
/// # Arguments
///
/// * `message` - Message to render
/// * `palette` - Colours for the current theme
/// * `show_timestamps` - Append the message time to the label line
pub fn render_message(message: &Message, palette: &Palette, show_timestamps: bool) -> String {
    let label = match message.sender {
        Sender::User => palette.user("You").bold().to_string(),
        Sender::Ai => palette.accent("ChatGPT").to_string(),
    };

    let mut header = label;
    if show_timestamps && !message.timestamp.is_empty() {
        header.push_str(&format!(" {}", palette.muted(&message.timestamp)));
    }

    let body: Vec<String> = message
        .text
        .lines()
        .map(|line| {
            let styled = match message.sender {
                Sender::User => palette.user(line),
                Sender::Ai => palette.assistant(line),
            };
            format!("  {}", styled)
        })
        .collect();

    if body.is_empty() {
        header
    } else {
        format!("{}\n{}", header, body.join("\n"))
    }
}

/// Render a whole conversation, or the empty state
pub fn render_messages(messages: &[Message], palette: &Palette, show_timestamps: bool) -> String {
    if messages.is_empty() {
        return palette.muted(EMPTY_STATE).to_string();
    }
    messages
        .iter()
        .map(|m| render_message(m, palette, show_timestamps))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Shown while a send is outstanding
pub fn typing_indicator(palette: &Palette) -> String {
    format!("{} {}", palette.accent("ChatGPT"), palette.muted("is typing..."))
}

/// Numbered list of staged attachments
pub fn render_attachments(attachments: &[Attachment], palette: &Palette) -> String {
    if attachments.is_empty() {
        return palette.muted("No attachments staged").to_string();
    }
    attachments
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "  {}. {} {}",
                i + 1,
                a.name,
                palette.muted(&format!("({})", a.display_size()))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate to `max` characters, adding "..." when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
