//! Directory layout for attachment files and previews.

use std::path::{Path, PathBuf};

use at_core::errors::AppDirsError;
use at_core::ports::AttachmentMessage;
use at_core::{Attachment, MessageId};
use tracing::info;

pub const ATTACHMENT_DIR_NAME: &str = "attachments";
pub const PREVIEW_DIR_NAME: &str = "preview";

/// Suffix of previews received inline with a message.
const INLINE_PREVIEW_SUFFIX: &str = "_bob";
/// Suffix of previews rendered locally; differs so a local render never
/// overwrites a received one.
const GENERATED_PREVIEW_SUFFIX: &str = "_bob_";

/// The two directories owned by the transfer subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDirs {
    attachments: PathBuf,
    previews: PathBuf,
}

impl AttachmentDirs {
    /// Derive the layout under `base_dir` without touching the filesystem.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            attachments: base_dir.join(ATTACHMENT_DIR_NAME),
            previews: base_dir.join(PREVIEW_DIR_NAME),
        }
    }

    /// Derive the layout under `base_dir` and create missing directories.
    pub fn prepare(base_dir: &Path) -> Result<Self, AppDirsError> {
        let dirs = Self::new(base_dir);
        create_if_missing(&dirs.attachments, "attachment")?;
        create_if_missing(&dirs.previews, "preview")?;
        Ok(dirs)
    }

    pub fn attachments(&self) -> &Path {
        &self.attachments
    }

    pub fn previews(&self) -> &Path {
        &self.previews
    }

    /// Resolve an attachment's stored path.
    ///
    /// Empty and absolute paths are returned unchanged; relative paths are
    /// resolved against the attachment directory.
    pub fn absolute_file_path(&self, attachment: &Attachment) -> PathBuf {
        let path = &attachment.file_path;
        if path.as_os_str().is_empty() || path.is_absolute() {
            path.clone()
        } else {
            self.attachments.join(path)
        }
    }

    /// On-disk location of the message's preview image, if it has one.
    pub fn image_preview_path<M>(&self, message: &M) -> Option<PathBuf>
    where
        M: AttachmentMessage + ?Sized,
    {
        let preview = message.preview()?;
        if preview.filename.is_empty() || !preview.mime_type.is_image() {
            return None;
        }
        Some(self.previews.join(&preview.filename))
    }
}

/// File name for a preview received inline with the message.
pub fn inline_preview_file_name(message_id: &MessageId, extension: &str) -> String {
    format!("{message_id}{INLINE_PREVIEW_SUFFIX}.{extension}")
}

/// File name for a preview rendered from the downloaded attachment.
pub fn generated_preview_file_name(message_id: &MessageId, extension: &str) -> String {
    format!("{message_id}{GENERATED_PREVIEW_SUFFIX}.{extension}")
}

fn create_if_missing(dir: &Path, label: &str) -> Result<(), AppDirsError> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| AppDirsError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;
    info!(path = %dir.display(), "created {label} directory");
    Ok(())
}
