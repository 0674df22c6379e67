//! Special commands parser for the interactive chat session
//!
//! Lines starting with `/` are commands; everything else is a message for
//! the assistant. Command names are case-insensitive, arguments (titles,
//! paths, model ids) are kept as typed.

use crate::preferences::{parse_flag, Theme};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new chat
    NewChat,
    /// Show the sidebar
    ListChats,
    /// Open a chat by index, id, or id prefix
    OpenChat(String),
    /// Delete a chat; `None` means the current one
    DeleteChat(Option<String>),
    /// Delete every chat
    DeleteAll,
    /// Rename the current chat
    Rename(String),
    /// Stage a file for the next message
    Attach(PathBuf),
    /// Remove a staged file (1-based index)
    Detach(usize),
    /// List staged files
    ListAttachments,
    SetTheme(Theme),
    SetModel(String),
    ListModels,
    SetTimestamps(bool),
    SetAutoSave(bool),
    ShowSettings,
    ShowProfile,
    /// Export chats, optionally to an explicit path
    Export(Option<PathBuf>),
    Import(PathBuf),
    Help,
    Exit,
    /// Not a special command
    ///
    /// The input should be sent as a message.
    None,
}

fn required<'a>(command: &str, usage: &str, arg: &'a str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg)
    }
}

fn flag(command: &str, usage: &str, arg: &str) -> Result<bool, CommandError> {
    let arg = required(command, usage, arg)?;
    parse_flag(arg).ok_or_else(|| CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    })
}

/// Parse a line of user input into a special command
///
/// # Arguments
///
/// * `input` - Raw line from the composer
///
/// # Returns
///
/// Returns the parsed command, `SpecialCommand::None` for plain messages,
/// or a `CommandError` for malformed commands
///
/// # Examples
///
/// ```
/// use chatterm::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/bogus").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match name.as_str() {
        "/new" => Ok(SpecialCommand::NewChat),
        "/chats" | "/history" => Ok(SpecialCommand::ListChats),
        "/open" => {
            let arg = required("/open", "/open <number|id>", arg)?;
            Ok(SpecialCommand::OpenChat(arg.to_string()))
        }
        "/delete" => Ok(SpecialCommand::DeleteChat(
            (!arg.is_empty()).then(|| arg.to_string()),
        )),
        "/delete-all" | "/clear-all" => Ok(SpecialCommand::DeleteAll),
        "/rename" => {
            let arg = required("/rename", "/rename <title>", arg)?;
            Ok(SpecialCommand::Rename(arg.to_string()))
        }
        "/attach" => {
            let arg = required("/attach", "/attach <path>", arg)?;
            Ok(SpecialCommand::Attach(PathBuf::from(arg)))
        }
        "/detach" => {
            let arg = required("/detach", "/detach <number>", arg)?;
            match arg.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(SpecialCommand::Detach(n)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/detach".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }
        "/attachments" => Ok(SpecialCommand::ListAttachments),
        "/theme" => {
            let arg = required("/theme", "/theme <light|dark|system>", arg)?;
            Theme::parse_str(arg)
                .map(SpecialCommand::SetTheme)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/theme".to_string(),
                    arg: arg.to_string(),
                })
        }
        "/model" => {
            let arg = required("/model", "/model <id>", arg)?;
            Ok(SpecialCommand::SetModel(arg.to_string()))
        }
        "/models" => Ok(SpecialCommand::ListModels),
        "/timestamps" => flag("/timestamps", "/timestamps <on|off>", arg)
            .map(SpecialCommand::SetTimestamps),
        "/autosave" | "/auto-save" => {
            flag("/autosave", "/autosave <on|off>", arg).map(SpecialCommand::SetAutoSave)
        }
        "/settings" => Ok(SpecialCommand::ShowSettings),
        "/profile" => Ok(SpecialCommand::ShowProfile),
        "/export" => Ok(SpecialCommand::Export(
            (!arg.is_empty()).then(|| PathBuf::from(arg)),
        )),
        "/import" => {
            let arg = required("/import", "/import <path>", arg)?;
            Ok(SpecialCommand::Import(PathBuf::from(arg)))
        }
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help for the interactive session
pub fn print_help() {
    println!(
        r#"
Commands for the Interactive Chat Session
=========================================

CHATS:
  /new                 - Start a new chat
  /chats               - Show the chat list
  /open <n|id>         - Open a chat by list number or id
  /rename <title>      - Rename the current chat
  /delete [n|id]       - Delete a chat (the current one by default)
  /delete-all          - Delete every chat

ATTACHMENTS:
  /attach <path>       - Stage a file for the next message
  /detach <n>          - Remove a staged file
  /attachments         - List staged files

SETTINGS:
  /settings            - Show all preferences
  /theme <t>           - Set theme: light, dark, or system
  /models              - List available models
  /model <id>          - Select the model sent with messages
  /timestamps <on|off> - Show or hide message times
  /autosave <on|off>   - Keep input history between sessions

ACCOUNT & DATA:
  /profile             - Show profile, usage, and billing
  /export [path]       - Export all chats to JSON
  /import <path>       - Check an exported file

SESSION:
  /help                - Show this help message
  /exit                - Leave the session (also: exit, quit, Ctrl-D)

NOTES:
  - Command names are case-insensitive
  - Anything not starting with / is sent as a message
  - Sending with no chat open starts a new one
"#
    );
}
