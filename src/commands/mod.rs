/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: Interactive chat session
- `chats`: One-shot conversation management
- `settings`: Preference display and updates
- `profile`: Profile, usage, and billing panel
- `data`: Export and import of chat data

Handlers build on the library components: the session controller, the
preference object, and the view renderers.
*/

use crate::api::HttpChatApi;
use crate::config::Config;
use crate::error::{ChattermError, Result};
use crate::notify::TerminalNotifier;
use crate::preferences::{JsonFilePreferenceStore, Settings};
use crate::session::ChatSession;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

pub mod chats;
pub mod data;
pub mod profile;
pub mod settings;
pub mod special_commands;

/// Open the preference file named by the config, or the default one
///
/// # Errors
///
/// Returns error if no preference location can be determined
pub fn open_settings(config: &Config) -> Result<Arc<Settings>> {
    let store = match &config.storage.preferences_path {
        Some(path) => JsonFilePreferenceStore::new_with_path(path.clone()),
        None => JsonFilePreferenceStore::new()?,
    };
    tracing::debug!("Using preferences at {}", store.path().display());
    Ok(Settings::shared(Box::new(store)))
}

/// Wire a session to the configured backend
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built
pub fn build_session(config: &Config, settings: Arc<Settings>) -> Result<ChatSession> {
    let api = HttpChatApi::new(&config.api)?;
    Ok(ChatSession::new(
        Arc::new(api),
        Arc::new(TerminalNotifier),
        settings,
        config.composer.clone(),
    ))
}

/// Where interactive line history is kept
///
/// # Errors
///
/// Returns error if no data directory can be determined
pub fn history_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.storage.history_path {
        return Ok(path.clone());
    }
    let proj_dirs = directories::ProjectDirs::from("com", "chatterm", "chatterm")
        .ok_or_else(|| ChattermError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("history.txt"))
}

/// Whether a confirmation answer means yes
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask a y/N question on stdin
///
/// Anything other than `y`/`yes` (including end of input) is a no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush().map_err(ChattermError::Io)?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(ChattermError::Io)?;
    Ok(is_yes(&answer))
}

// Interactive chat session handler
pub mod chat {
    //! Interactive chat session.
    //!
    //! Loads the chat list, then runs a readline-based loop: plain lines
    //! are sent as messages through the session controller, `/` lines are
    //! special commands.

    use super::*;
    use crate::commands::special_commands::{
        parse_special_command, print_help, SpecialCommand,
    };
    use crate::notify::Notification;
    use crate::profile::StaticProfileSource;
    use crate::session::SendOutcome;
    use crate::view::{self, sidebar};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `open` - Chat to open on start (index, id, or id prefix)
    ///
    /// # Examples
    ///
    /// ```
    /// use chatterm::commands::chat;
    /// use chatterm::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default(), None).await?;
    /// ```
    pub async fn run_chat(config: Config, open: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let prefs = open_settings(&config)?;
        let session = build_session(&config, prefs.clone())?;
        let profile_source = StaticProfileSource::new(config.profile.clone());

        let mut rl = DefaultEditor::new()?;
        let history = history_path(&config)?;
        if prefs.auto_save() {
            if let Err(e) = rl.load_history(&history) {
                tracing::debug!("No line history loaded from {}: {}", history.display(), e);
            }
        }

        print_welcome_banner(&config);

        if let Some(chats) = session.load_chats().await {
            if !chats.is_empty() {
                let palette = prefs.palette();
                println!("{}\n", sidebar::render_sidebar(&chats, None, &palette));
            }
        }

        if let Some(reference) = open {
            open_chat(&session, &reference).await;
        }

        loop {
            let prompt = format_prompt(&session);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::None => {
                            session.set_draft(trimmed);
                            send(&session).await;
                        }
                        SpecialCommand::NewChat => {
                            session.create_chat().await;
                        }
                        SpecialCommand::ListChats => {
                            if session.load_chats().await.is_some() {
                                let state = session.snapshot();
                                println!(
                                    "{}\n",
                                    sidebar::render_sidebar(
                                        &state.chats,
                                        state.current_chat.as_deref(),
                                        &prefs.palette()
                                    )
                                );
                            }
                        }
                        SpecialCommand::OpenChat(reference) => {
                            open_chat(&session, &reference).await;
                        }
                        SpecialCommand::DeleteChat(reference) => {
                            let target = match reference {
                                Some(r) => resolve(&session, &r).await,
                                None => session.snapshot().current().cloned(),
                            };
                            let Some(chat) = target else {
                                println!("{}", "No chat to delete.".yellow());
                                continue;
                            };
                            let question = format!("Delete chat \"{}\"?", chat.title);
                            if ask(&mut rl, &question)? && session.delete_chat(&chat.id).await
                            {
                                println!("{}", format!("Deleted chat {}", chat.title).green());
                            }
                        }
                        SpecialCommand::DeleteAll => {
                            if session.load_chats().await.is_none() {
                                continue;
                            }
                            let count = session.chats().len();
                            if count == 0 {
                                println!("{}", "No chats to delete.".yellow());
                                continue;
                            }
                            let question = format!(
                                "Delete all {} chats? This action cannot be undone.",
                                count
                            );
                            if ask(&mut rl, &question)? {
                                session.delete_all_chats().await;
                            }
                        }
                        SpecialCommand::Rename(title) => {
                            match session.current_chat_id() {
                                Some(id) => {
                                    if let Some(chat) = session.rename_chat(&id, &title).await {
                                        println!(
                                            "{}",
                                            format!("Renamed to \"{}\"", chat.title).green()
                                        );
                                    }
                                }
                                None => println!("{}", "Open a chat first.".yellow()),
                            }
                        }
                        SpecialCommand::Attach(path) => match session.stage_attachment(&path) {
                            Ok(attachment) => println!(
                                "{}",
                                format!(
                                    "Attached {} ({})",
                                    attachment.name,
                                    attachment.display_size()
                                )
                                .green()
                            ),
                            Err(e) => session
                                .notifier()
                                .notify(Notification::error("Attachment rejected", e.to_string())),
                        },
                        SpecialCommand::Detach(n) => match session.unstage_attachment(n - 1) {
                            Some(a) => println!("Removed {}", a.name),
                            None => println!("{}", format!("No attachment #{}", n).yellow()),
                        },
                        SpecialCommand::ListAttachments => {
                            let state = session.snapshot();
                            println!(
                                "{}",
                                view::render_attachments(
                                    state.composer.attachments(),
                                    &prefs.palette()
                                )
                            );
                        }
                        SpecialCommand::SetTheme(theme) => {
                            settings::set_theme(&prefs, session.notifier().as_ref(), theme);
                        }
                        SpecialCommand::SetModel(id) => {
                            settings::set_model(&prefs, session.notifier().as_ref(), &id);
                        }
                        SpecialCommand::ListModels => settings::show_models(&prefs),
                        SpecialCommand::SetTimestamps(on) => {
                            settings::set_timestamps(&prefs, session.notifier().as_ref(), on);
                            reprint_conversation(&session);
                        }
                        SpecialCommand::SetAutoSave(on) => {
                            settings::set_auto_save(&prefs, session.notifier().as_ref(), on);
                        }
                        SpecialCommand::ShowSettings => settings::show_settings(&prefs),
                        SpecialCommand::ShowProfile => {
                            profile::show_profile(&session, &profile_source).await;
                        }
                        SpecialCommand::Export(path) => {
                            data::export_with_notice(&session, path).await;
                        }
                        SpecialCommand::Import(path) => {
                            data::import_with_notice(session.notifier().as_ref(), &path);
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        if prefs.auto_save() {
            save_history(&mut rl, &history);
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn send(session: &ChatSession) {
        let palette = session.settings().palette();
        println!("{}", view::typing_indicator(&palette));

        match session.send_message().await {
            SendOutcome::Sent(exchange) => {
                let show = session.settings().show_timestamps();
                println!(
                    "\n{}\n",
                    view::render_message(&exchange.ai_response, &palette, show)
                );
            }
            SendOutcome::Busy => {
                println!("{}", "Still waiting for the previous reply.".yellow());
            }
            SendOutcome::Empty => {}
            SendOutcome::Failed => {
                let draft = session.snapshot().composer.draft().to_string();
                println!(
                    "{}",
                    format!("Your message was kept: {}", draft.trim()).yellow()
                );
            }
        }
    }

    async fn resolve(session: &ChatSession, reference: &str) -> Option<crate::api::Chat> {
        if session.chats().is_empty() {
            session.load_chats().await;
        }
        let chats = session.chats();
        let found = sidebar::resolve_chat(&chats, reference).cloned();
        if found.is_none() {
            println!(
                "{}",
                format!("No chat matches \"{}\". Use /chats to list them.", reference).yellow()
            );
        }
        found
    }

    async fn open_chat(session: &ChatSession, reference: &str) {
        let Some(chat) = resolve(session, reference).await else {
            return;
        };
        if session.select_chat(&chat.id).await.is_some() {
            println!("{}\n", format!("── {} ──", chat.title).bold());
            reprint_conversation(session);
        }
    }

    fn reprint_conversation(session: &ChatSession) {
        let state = session.snapshot();
        if state.current_chat.is_none() {
            return;
        }
        let prefs = session.settings();
        println!(
            "{}\n",
            view::render_messages(&state.messages, &prefs.palette(), prefs.show_timestamps())
        );
    }

    fn ask(rl: &mut DefaultEditor, question: &str) -> Result<bool> {
        match rl.readline(&format!("{} [y/N] ", question)) {
            Ok(answer) => Ok(is_yes(&answer)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
            Err(e) => Err(ChattermError::Command(format!("Failed to read answer: {}", e)).into()),
        }
    }

    fn save_history(rl: &mut DefaultEditor, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save line history to {}: {}", path.display(), e);
        }
    }

    fn format_prompt(session: &ChatSession) -> String {
        let state = session.snapshot();
        let title = state
            .current()
            .map(|c| view::truncate(&c.title, 24))
            .unwrap_or_else(|| "new".to_string());
        let attachments = state.composer.attachments().len();
        if attachments > 0 {
            format!("[{}] +{} ❯ ", title.cyan(), attachments)
        } else {
            format!("[{}] ❯ ", title.cyan())
        }
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              chatterm - How can I help you today?            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Backend: {}", config.api.base_url.cyan());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_history_path_override() {
        let mut config = Config::default();
        config.storage.history_path = Some(PathBuf::from("/tmp/chatterm-history.txt"));
        assert_eq!(
            history_path(&config).unwrap(),
            PathBuf::from("/tmp/chatterm-history.txt")
        );
    }

    #[test]
    fn test_open_settings_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.preferences_path = Some(dir.path().join("prefs.json"));

        let settings = open_settings(&config).unwrap();
        settings.set_auto_save(false).unwrap();
        assert!(dir.path().join("prefs.json").exists());
    }
}
