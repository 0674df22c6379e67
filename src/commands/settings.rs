//! Preference display and updates
//!
//! Shared by `chatterm settings ...` and the interactive `/theme`,
//! `/model`, `/timestamps`, `/autosave`, `/settings`, and `/models`
//! commands. Every change is written through [`Settings`] immediately.

use crate::cli::SettingsCommand;
use crate::error::{ChattermError, Result};
use crate::notify::{Notification, Notifier};
use crate::preferences::{find_model, parse_flag, Settings, Theme};
use crate::view::panels;

/// Handle settings commands
pub fn handle_settings(
    settings: &Settings,
    notifier: &dyn Notifier,
    command: SettingsCommand,
) -> Result<()> {
    let ok = match command {
        SettingsCommand::Show => {
            show_settings(settings);
            true
        }
        SettingsCommand::Models => {
            show_models(settings);
            true
        }
        SettingsCommand::Theme { theme } => {
            let theme = Theme::parse_str(&theme).map_err(ChattermError::Preferences)?;
            set_theme(settings, notifier, theme)
        }
        SettingsCommand::Model { id } => set_model(settings, notifier, &id),
        SettingsCommand::AutoSave { value } => {
            set_auto_save(settings, notifier, flag_value("auto-save", &value)?)
        }
        SettingsCommand::Timestamps { value } => {
            set_timestamps(settings, notifier, flag_value("timestamps", &value)?)
        }
    };

    if ok {
        Ok(())
    } else {
        Err(ChattermError::Command("Preferences could not be saved".into()).into())
    }
}

fn flag_value(name: &str, value: &str) -> Result<bool> {
    parse_flag(value).ok_or_else(|| {
        ChattermError::Preferences(format!("{} expects on or off, got {}", name, value)).into()
    })
}

pub fn show_settings(settings: &Settings) {
    println!("{}\n", panels::settings_panel(&settings.get(), &settings.palette()));
}

pub fn show_models(settings: &Settings) {
    println!("\nAvailable models:");
    panels::models_table(&settings.selected_model()).printstd();
    println!();
}

/// Switch theme and confirm; returns whether the change was saved
pub fn set_theme(settings: &Settings, notifier: &dyn Notifier, theme: Theme) -> bool {
    saved(notifier, settings.set_theme(theme), || {
        Notification::info("Theme updated", format!("Switched to {} theme", theme))
    })
}

/// Select a model and confirm; returns whether the change was saved
pub fn set_model(settings: &Settings, notifier: &dyn Notifier, id: &str) -> bool {
    let name = find_model(id.trim())
        .map(|m| m.name.to_string())
        .unwrap_or_else(|| id.trim().to_string());
    saved(notifier, settings.set_selected_model(id), || {
        Notification::info("Model updated", format!("Switched to {}", name))
    })
}

pub fn set_timestamps(settings: &Settings, notifier: &dyn Notifier, enabled: bool) -> bool {
    saved(notifier, settings.set_show_timestamps(enabled), || {
        Notification::info(
            "Setting updated",
            format!("Timestamps {}", if enabled { "shown" } else { "hidden" }),
        )
    })
}

pub fn set_auto_save(settings: &Settings, notifier: &dyn Notifier, enabled: bool) -> bool {
    saved(notifier, settings.set_auto_save(enabled), || {
        Notification::info(
            "Setting updated",
            format!("Auto-save {}", if enabled { "enabled" } else { "disabled" }),
        )
    })
}

fn saved(
    notifier: &dyn Notifier,
    result: Result<()>,
    success: impl FnOnce() -> Notification,
) -> bool {
    match result {
        Ok(()) => {
            notifier.notify(success());
            true
        }
        Err(e) => {
            tracing::error!("Failed to save preference: {:#}", e);
            notifier.notify(Notification::error("Failed to save setting", e.to_string()));
            false
        }
    }
}
