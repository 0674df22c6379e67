//! Export and import of chat data
//!
//! Export writes the chat list as pretty-printed JSON. Import only checks
//! that a file is a valid export and reports how many chats it holds;
//! nothing is uploaded to the backend.

use crate::api::Chat;
use crate::error::{ChattermError, Result};
use crate::notify::{Notification, Notifier};
use crate::session::ChatSession;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Default export file name for `date`, e.g. `chatterm-export-2025-01-31.json`
pub fn default_export_name(date: chrono::NaiveDate) -> String {
    format!("chatterm-export-{}.json", date.format("%Y-%m-%d"))
}

/// Write `chats` to `path` as pretty-printed JSON
///
/// # Errors
///
/// Returns error if serialization or the write fails
pub fn write_export(chats: &[Chat], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(chats).map_err(ChattermError::Serialization)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))
        .map_err(|e| ChattermError::Storage(format!("{:#}", e)))?;
    Ok(())
}

/// Read an export file and count its chats
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a JSON array of
/// chats
pub fn read_export(path: &Path) -> Result<usize> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .map_err(|e| ChattermError::Storage(format!("{:#}", e)))?;
    let chats: Vec<Chat> = serde_json::from_str(&contents)
        .map_err(|e| ChattermError::Command(format!("Invalid file format: {}", e)))?;
    Ok(chats.len())
}

/// Export the backend's chat list
///
/// # Returns
///
/// Returns the path written and the number of chats exported
///
/// # Errors
///
/// Returns error if the list cannot be loaded or the file cannot be written
pub async fn export_chats(session: &ChatSession, output: Option<PathBuf>) -> Result<(PathBuf, usize)> {
    let chats = session
        .load_chats()
        .await
        .ok_or_else(|| ChattermError::Command("Failed to export chat history".into()))?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(default_export_name(chrono::Local::now().date_naive())));
    write_export(&chats, &path)?;
    tracing::info!("Exported {} chats to {}", chats.len(), path.display());
    Ok((path, chats.len()))
}

/// Export and report the outcome as a notification
pub async fn export_with_notice(session: &ChatSession, output: Option<PathBuf>) -> bool {
    match export_chats(session, output).await {
        Ok((path, count)) => {
            session.notifier().notify(Notification::info(
                "Export successful",
                format!("Exported {} chats to {}", count, path.display()),
            ));
            true
        }
        Err(e) => {
            tracing::error!("Export failed: {:#}", e);
            session
                .notifier()
                .notify(Notification::error("Export failed", e.to_string()));
            false
        }
    }
}

/// Validate an export and report the outcome as a notification
pub fn import_with_notice(notifier: &dyn Notifier, path: &Path) -> bool {
    match read_export(path) {
        Ok(count) => {
            notifier.notify(Notification::info(
                "Import successful",
                format!("Imported {} chats", count),
            ));
            true
        }
        Err(e) => {
            tracing::error!("Import failed: {:#}", e);
            notifier.notify(Notification::error("Import failed", e.to_string()));
            false
        }
    }
}
