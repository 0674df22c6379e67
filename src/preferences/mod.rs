//! Client-local UI preferences
//!
//! Preferences (theme, selected model, auto-save, show-timestamps) live in
//! a small JSON file next to the user's other config, never on the server.
//! The application root creates one [`Settings`] object and hands it to
//! whoever needs to read or change a preference; every write goes straight
//! to the backing [`PreferenceStore`].

pub mod store;
pub mod theme;

pub use store::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use theme::{Palette, Theme};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Model used when nothing has been selected yet
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A selectable model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
}

/// Models offered in the settings panel
pub const AVAILABLE_MODELS: &[ModelOption] = &[
    ModelOption {
        id: "gpt-4o-mini",
        name: "GPT-4o Mini",
        provider: "OpenAI",
        description: "Fast and cost-effective",
    },
    ModelOption {
        id: "gpt-4o",
        name: "GPT-4o",
        provider: "OpenAI",
        description: "Most capable model",
    },
    ModelOption {
        id: "claude-3-5-sonnet-20241022",
        name: "Claude 3.5 Sonnet",
        provider: "Anthropic",
        description: "Excellent reasoning",
    },
    ModelOption {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        provider: "Google",
        description: "Latest from Google",
    },
];

/// Look up a model in the catalog
pub fn find_model(id: &str) -> Option<&'static ModelOption> {
    AVAILABLE_MODELS.iter().find(|m| m.id == id)
}

/// The persisted preference set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub selected_model: String,
    pub auto_save: bool,
    pub show_timestamps: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            selected_model: DEFAULT_MODEL.to_string(),
            auto_save: true,
            show_timestamps: true,
        }
    }
}

/// Injected preference object with read/write accessors
///
/// Reads come from an in-memory copy; writes update the copy and are
/// persisted immediately. A failed write leaves the in-memory value
/// unchanged so what the UI shows always matches what is on disk.
pub struct Settings {
    store: Box<dyn PreferenceStore>,
    current: Mutex<Preferences>,
}

impl Settings {
    /// Load the current preferences from `store`
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let current = store.load();
        tracing::debug!(?current, "Loaded preferences");
        Self {
            store,
            current: Mutex::new(current),
        }
    }

    /// Convenience for sharing across the session and command layer
    pub fn shared(store: Box<dyn PreferenceStore>) -> Arc<Self> {
        Arc::new(Self::load(store))
    }

    /// Snapshot of all preferences
    pub fn get(&self) -> Preferences {
        self.lock().clone()
    }

    pub fn theme(&self) -> Theme {
        self.lock().theme
    }

    pub fn selected_model(&self) -> String {
        self.lock().selected_model.clone()
    }

    pub fn auto_save(&self) -> bool {
        self.lock().auto_save
    }

    pub fn show_timestamps(&self) -> bool {
        self.lock().show_timestamps
    }

    /// Palette for the current theme, resolving `system` from the terminal
    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme().resolve())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.update(|p| p.theme = theme)
    }

    /// Select the model sent with the next message
    ///
    /// Any non-empty identifier is accepted.
    pub fn set_selected_model(&self, model: &str) -> Result<()> {
        let model = model.trim();
        if model.is_empty() {
            return Err(crate::error::ChattermError::Preferences(
                "model id cannot be empty".to_string(),
            )
            .into());
        }
        self.update(|p| p.selected_model = model.to_string())
    }

    pub fn set_auto_save(&self, enabled: bool) -> Result<()> {
        self.update(|p| p.auto_save = enabled)
    }

    pub fn set_show_timestamps(&self, enabled: bool) -> Result<()> {
        self.update(|p| p.show_timestamps = enabled)
    }

    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        change(&mut next);
        self.store.save(&next)?;
        *guard = next;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Preferences> {
        // Preferences stay consistent even if a holder panicked mid-read.
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse an on/off style flag as typed on the command line
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" | "enabled" => Some(true),
        "off" | "false" | "no" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, Theme::System);
        assert_eq!(prefs.selected_model, "gpt-4o-mini");
        assert!(prefs.auto_save);
        assert!(prefs.show_timestamps);
    }

    #[test]
    fn test_serialized_keys_match_local_storage_names() {
        let value = serde_json::to_value(Preferences::default()).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["theme", "selectedModel", "autoSave", "showTimestamps"] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj["theme"], "system");
    }

    #[test]
    fn test_settings_write_through() {
        let store = MemoryPreferenceStore::default();
        let settings = Settings::load(Box::new(store.clone()));

        settings.set_theme(Theme::Dark).unwrap();
        settings.set_selected_model("gpt-4o").unwrap();
        settings.set_show_timestamps(false).unwrap();

        assert_eq!(settings.theme(), Theme::Dark);
        assert_eq!(settings.selected_model(), "gpt-4o");
        assert!(!settings.show_timestamps());

        let persisted = store.load();
        assert_eq!(persisted.theme, Theme::Dark);
        assert_eq!(persisted.selected_model, "gpt-4o");
        assert!(!persisted.show_timestamps);
        assert!(persisted.auto_save);
    }

    #[test]
    fn test_settings_rejects_blank_model() {
        let settings = Settings::load(Box::new(MemoryPreferenceStore::default()));
        assert!(settings.set_selected_model("   ").is_err());
        assert_eq!(settings.selected_model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_settings_accepts_model_outside_catalog() {
        let settings = Settings::load(Box::new(MemoryPreferenceStore::default()));
        settings.set_selected_model("local-llama").unwrap();
        assert_eq!(settings.selected_model(), "local-llama");
        assert!(find_model("local-llama").is_none());
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let store = MemoryPreferenceStore::default();
        store.fail_writes(true);
        let settings = Settings::load(Box::new(store));

        assert!(settings.set_auto_save(false).is_err());
        assert!(settings.auto_save());
    }

    #[test]
    fn test_find_model() {
        assert_eq!(find_model("gpt-4o").map(|m| m.name), Some("GPT-4o"));
        assert!(find_model("gpt-5").is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag("OFF"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
