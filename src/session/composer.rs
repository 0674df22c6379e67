//! Message composer: the draft text and staged attachments
//!
//! Attachments are only staged locally. They are validated when staged,
//! cleared when a send starts, and put back if the send fails; nothing is
//! uploaded.

use crate::config::ComposerConfig;
use crate::error::{ChattermError, Result};
use std::path::{Path, PathBuf};

/// A file staged for the next message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl Attachment {
    /// Size formatted for display, e.g. "1.5 KB"
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

/// Draft text plus staged attachments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    draft: String,
    attachments: Vec<Attachment>,
}

impl Composer {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether there is anything worth sending
    pub fn has_text(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Validate and stage a file
    ///
    /// # Errors
    ///
    /// Returns `ChattermError::Attachment` if the path is missing, is not a
    /// regular file, exceeds the size limit, or the list is full
    pub fn stage(&mut self, path: &Path, limits: &ComposerConfig) -> Result<&Attachment> {
        if self.attachments.len() >= limits.max_attachments {
            return Err(ChattermError::Attachment(format!(
                "At most {} attachments can be staged",
                limits.max_attachments
            ))
            .into());
        }

        let attachment = validate_attachment(path, limits.max_attachment_bytes)?;
        tracing::debug!("Staged attachment {} ({} bytes)", attachment.name, attachment.size);
        self.attachments.push(attachment);
        Ok(&self.attachments[self.attachments.len() - 1])
    }

    /// Remove the attachment at `index` (0-based)
    pub fn unstage(&mut self, index: usize) -> Option<Attachment> {
        (index < self.attachments.len()).then(|| self.attachments.remove(index))
    }

    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    /// Empty the composer, handing back what it held
    pub fn take(&mut self) -> (String, Vec<Attachment>) {
        (
            std::mem::take(&mut self.draft),
            std::mem::take(&mut self.attachments),
        )
    }

    /// Put back what [`Composer::take`] returned
    pub fn restore(&mut self, draft: String, attachments: Vec<Attachment>) {
        self.draft = draft;
        self.attachments = attachments;
    }
}

/// Check that `path` is an existing regular file no larger than `max_bytes`
pub fn validate_attachment(path: &Path, max_bytes: u64) -> Result<Attachment> {
    let metadata = std::fs::metadata(path).map_err(|_| {
        ChattermError::Attachment(format!("File not found: {}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(
            ChattermError::Attachment(format!("Not a regular file: {}", path.display())).into(),
        );
    }

    let size = metadata.len();
    if size > max_bytes {
        return Err(ChattermError::Attachment(format!(
            "File too large: {} (max {})",
            format_size(size),
            format_size(max_bytes)
        ))
        .into());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Attachment {
        path: path.to_path_buf(),
        name,
        size,
    })
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn limits(max_bytes: u64, max_count: usize) -> ComposerConfig {
        ComposerConfig {
            max_attachment_bytes: max_bytes,
            max_attachments: max_count,
        }
    }

    #[test]
    fn test_stage_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut composer = Composer::default();
        let staged = composer.stage(&path, &ComposerConfig::default()).unwrap();
        assert_eq!(staged.name, "notes.txt");
        assert_eq!(staged.size, 5);
        assert_eq!(composer.attachments().len(), 1);
    }

    #[test]
    fn test_stage_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let mut composer = Composer::default();
        let err = composer
            .stage(&dir.path().join("nope.txt"), &ComposerConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("File not found"));
        assert!(composer.attachments().is_empty());
    }

    #[test]
    fn test_stage_rejects_directory() {
        let dir = tempdir().unwrap();
        let mut composer = Composer::default();
        let err = composer
            .stage(dir.path(), &ComposerConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Not a regular file"));
    }

    #[test]
    fn test_stage_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let mut composer = Composer::default();
        let err = composer.stage(&path, &limits(1024, 10)).unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_stage_enforces_count_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "a").unwrap();

        let mut composer = Composer::default();
        composer.stage(&path, &limits(1024, 1)).unwrap();
        let err = composer.stage(&path, &limits(1024, 1)).unwrap_err();
        assert!(err.to_string().contains("At most 1"));
    }

    #[test]
    fn test_unstage_out_of_range() {
        let mut composer = Composer::default();
        assert!(composer.unstage(0).is_none());
    }

    #[test]
    fn test_take_and_restore() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "a").unwrap();

        let mut composer = Composer::default();
        composer.set_draft("hello");
        composer.stage(&path, &ComposerConfig::default()).unwrap();
        let before = composer.clone();

        let (text, attachments) = composer.take();
        assert!(!composer.has_text());
        assert!(composer.attachments().is_empty());

        composer.restore(text, attachments);
        assert_eq!(composer, before);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10.0 MB");
    }
}
