//! Command-line interface definition for chatterm
//!
//! This module defines the CLI structure using clap's derive API: an
//! interactive chat session plus one-shot commands for chats, settings,
//! the profile panel, and data export/import.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chatterm - a terminal chat client for a REST chat backend
///
/// Talk to the assistant, browse and manage past conversations, and tweak
/// client-side preferences.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatterm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend base URL from config
    #[arg(long)]
    pub api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for chatterm
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Open an existing chat (index, id, or id prefix) on start
        #[arg(long)]
        chat: Option<String>,
    },

    /// Manage conversations
    Chats {
        #[command(subcommand)]
        command: ChatsCommand,
    },

    /// Show or change client preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Show the profile, usage, and billing panel
    Profile,

    /// Export all chats to a JSON file
    Export {
        /// Output path (defaults to chatterm-export-YYYY-MM-DD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check an exported JSON file and report what it holds
    Import {
        /// File produced by `export`
        path: PathBuf,
    },
}

/// Conversation management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatsCommand {
    /// List chats in backend order
    List,

    /// Print a chat's messages
    Show {
        /// Chat index, id, or id prefix
        id: String,
    },

    /// Delete one chat
    Delete {
        /// Chat index, id, or id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every chat
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Rename a chat
    Rename {
        /// Chat index, id, or id prefix
        id: String,

        /// New title
        title: String,
    },

    /// Create an empty chat
    New,
}

/// Preference subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Show all preferences
    Show,

    /// List the model catalog
    Models,

    /// Set the theme (light, dark, system)
    Theme { theme: String },

    /// Select the model sent with messages
    Model { id: String },

    /// Save interactive line history between sessions (on, off)
    AutoSave { value: String },

    /// Show message timestamps (on, off)
    Timestamps { value: String },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            api_url: None,
            command: Commands::Chat { chat: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.api_url.is_none());
        assert!(matches!(cli.command, Commands::Chat { chat: None }));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["chatterm", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { chat: None }));
    }

    #[test]
    fn test_cli_parse_chat_with_existing_chat() {
        let cli = Cli::try_parse_from(["chatterm", "chat", "--chat", "2"]).unwrap();
        match cli.command {
            Commands::Chat { chat } => assert_eq!(chat.as_deref(), Some("2")),
            _ => panic!("Expected Chat command"),
        }
    }

    #[test]
    fn test_cli_parse_chats_delete_with_yes() {
        let cli = Cli::try_parse_from(["chatterm", "chats", "delete", "abc", "--yes"]).unwrap();
        match cli.command {
            Commands::Chats {
                command: ChatsCommand::Delete { id, yes },
            } => {
                assert_eq!(id, "abc");
                assert!(yes);
            }
            _ => panic!("Expected chats delete"),
        }
    }

    #[test]
    fn test_cli_parse_chats_delete_all() {
        let cli = Cli::try_parse_from(["chatterm", "chats", "delete-all"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chats {
                command: ChatsCommand::DeleteAll { yes: false }
            }
        ));
    }

    #[test]
    fn test_cli_parse_chats_rename() {
        let cli =
            Cli::try_parse_from(["chatterm", "chats", "rename", "1", "Trip plans"]).unwrap();
        match cli.command {
            Commands::Chats {
                command: ChatsCommand::Rename { id, title },
            } => {
                assert_eq!(id, "1");
                assert_eq!(title, "Trip plans");
            }
            _ => panic!("Expected chats rename"),
        }
    }

    #[test]
    fn test_cli_parse_settings_theme() {
        let cli = Cli::try_parse_from(["chatterm", "settings", "theme", "dark"]).unwrap();
        match cli.command {
            Commands::Settings {
                command: SettingsCommand::Theme { theme },
            } => assert_eq!(theme, "dark"),
            _ => panic!("Expected settings theme"),
        }
    }

    #[test]
    fn test_cli_parse_settings_auto_save() {
        let cli = Cli::try_parse_from(["chatterm", "settings", "auto-save", "off"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                command: SettingsCommand::AutoSave { .. }
            }
        ));
    }

    #[test]
    fn test_cli_parse_export_with_output() {
        let cli = Cli::try_parse_from(["chatterm", "export", "-o", "/tmp/out.json"]).unwrap();
        match cli.command {
            Commands::Export { output } => {
                assert_eq!(output, Some(PathBuf::from("/tmp/out.json")));
            }
            _ => panic!("Expected export"),
        }
    }

    #[test]
    fn test_cli_parse_import_requires_path() {
        assert!(Cli::try_parse_from(["chatterm", "import"]).is_err());
    }

    #[test]
    fn test_cli_parse_api_url_and_verbose() {
        let cli = Cli::try_parse_from([
            "chatterm",
            "-v",
            "--api-url",
            "http://example.com",
            "profile",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.api_url.as_deref(), Some("http://example.com"));
        assert!(matches!(cli.command, Commands::Profile));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["chatterm"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["chatterm", "invalid"]).is_err());
    }
}
