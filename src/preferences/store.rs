//! Persistence for [`Preferences`]

use super::{Preferences, Theme};
use crate::error::{ChattermError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Backing store for preferences
///
/// `load` never fails: unreadable or malformed data yields defaults so a
/// corrupted file cannot keep the client from starting.
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Preferences;
    fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// Stores preferences as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    /// Open the default preferences file
    ///
    /// Uses `CHATTERM_PREFERENCES` when set, otherwise `preferences.json`
    /// in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns error if no config directory can be determined
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("CHATTERM_PREFERENCES") {
            return Ok(Self::new_with_path(override_path));
        }

        let proj_dirs = ProjectDirs::from("com", "chatterm", "chatterm").ok_or_else(|| {
            ChattermError::Preferences("Could not determine config directory".into())
        })?;

        Ok(Self::new_with_path(
            proj_dirs.config_dir().join("preferences.json"),
        ))
    }

    /// Use an explicit file path
    ///
    /// # Examples
    ///
    /// ```
    /// use chatterm::preferences::{JsonFilePreferenceStore, PreferenceStore};
    ///
    /// let dir = std::env::temp_dir().join("chatterm-doc-prefs");
    /// let store = JsonFilePreferenceStore::new_with_path(dir.join("prefs.json"));
    /// let prefs = store.load();
    /// assert_eq!(prefs.selected_model, "gpt-4o-mini");
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Preferences {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No preferences at {}, using defaults", self.path.display());
                return Preferences::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read preferences {}: {}",
                    self.path.display(),
                    e
                );
                return Preferences::default();
            }
        };

        parse_lenient(&contents).unwrap_or_else(|e| {
            tracing::warn!(
                "Ignoring malformed preferences {}: {}",
                self.path.display(),
                e
            );
            Preferences::default()
        })
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create preferences directory")
                .map_err(|e| ChattermError::Preferences(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(preferences).map_err(ChattermError::Serialization)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
            .map_err(|e| ChattermError::Preferences(e.to_string()))?;
        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// Parse a preferences document, keeping valid keys and defaulting the rest
///
/// Each key is read independently so one garbled value (say an unknown
/// theme) does not discard the others.
fn parse_lenient(contents: &str) -> std::result::Result<Preferences, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    let mut prefs = Preferences::default();

    if let Some(theme) = value
        .get("theme")
        .and_then(|v| serde_json::from_value::<Theme>(v.clone()).ok())
    {
        prefs.theme = theme;
    }
    if let Some(model) = value
        .get("selectedModel")
        .and_then(|v| v.as_str())
        .filter(|m| !m.trim().is_empty())
    {
        prefs.selected_model = model.to_string();
    }
    if let Some(auto_save) = value.get("autoSave").and_then(|v| v.as_bool()) {
        prefs.auto_save = auto_save;
    }
    if let Some(show) = value.get("showTimestamps").and_then(|v| v.as_bool()) {
        prefs.show_timestamps = show;
    }

    Ok(prefs)
}

/// In-memory store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    preferences: Preferences,
    fail_writes: bool,
}

impl MemoryPreferenceStore {
    pub fn with(preferences: Preferences) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                preferences,
                fail_writes: false,
            })),
        }
    }

    /// Make subsequent saves fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preferences {
        self.lock().preferences.clone()
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(ChattermError::Preferences("store is read-only".into()).into());
        }
        inner.preferences = preferences.clone();
        Ok(())
    }
}
