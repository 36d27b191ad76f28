use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use at_core::ports::{ControlPort, CryptoBridgePort, InboundMessage, TransferClientPort};
use at_core::AttachmentError;
use tracing::{debug, info, warn};

use super::CreateImagePreviewUseCase;
use crate::attachment_dirs::AttachmentDirs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file is stored in the attachment directory under `file_name`.
    Saved {
        file_name: String,
        preview_created: bool,
    },
    /// The transfer client reported success without a file.
    EmptyPath,
}

/// Forwards download progress to the message, never going backwards.
struct ProgressTracker {
    message: Arc<dyn InboundMessage>,
    last: AtomicU8,
}

impl ProgressTracker {
    fn new(message: Arc<dyn InboundMessage>) -> Self {
        Self {
            message,
            last: AtomicU8::new(0),
        }
    }

    fn report(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.last.fetch_max(percent, Ordering::Relaxed);
        if percent > previous {
            self.message.set_download_progress(percent);
        }
    }
}

/// Download the attachment of an incoming message.
pub struct DownloadAttachmentUseCase {
    crypto: Arc<dyn CryptoBridgePort>,
    transfer: Arc<dyn TransferClientPort>,
    control: Arc<dyn ControlPort>,
    preview: Arc<CreateImagePreviewUseCase>,
    dirs: AttachmentDirs,
}

impl DownloadAttachmentUseCase {
    pub fn new(
        crypto: Arc<dyn CryptoBridgePort>,
        transfer: Arc<dyn TransferClientPort>,
        control: Arc<dyn ControlPort>,
        preview: Arc<CreateImagePreviewUseCase>,
        dirs: AttachmentDirs,
    ) -> Self {
        Self {
            crypto,
            transfer,
            control,
            preview,
            dirs,
        }
    }

    #[tracing::instrument(
        name = "usecase.transfer.download_attachment.execute",
        skip(self, message),
        fields(message_id = %message.id())
    )]
    pub async fn execute(
        &self,
        message: Arc<dyn InboundMessage>,
    ) -> Result<DownloadOutcome, AttachmentError> {
        let Some(attachment) = message.attachment() else {
            warn!("no attachment in message to download");
            return Err(AttachmentError::MissingAttachment);
        };
        let Some(url) = attachment.url.clone().filter(|url| !url.is_empty()) else {
            warn!("attachment has no url");
            return Err(AttachmentError::MissingUrl);
        };

        let tracker = ProgressTracker::new(message.clone());
        let progress = move |percent: u8| tracker.report(percent);
        let path = match self
            .transfer
            .download(&url, self.dirs.attachments(), &progress)
            .await
        {
            Ok(path) => path,
            Err(err) => {
                warn!(url = %url, error = %err, "download failed");
                self.control.report_failure(&err);
                return Err(err.into());
            }
        };

        let Some(file_name) = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
        else {
            warn!(url = %url, "download returned no file");
            return Ok(DownloadOutcome::EmptyPath);
        };
        message.set_attachment_file_name(&file_name);
        info!(file_name = %file_name, "download complete");

        if attachment.encryption.is_encrypted() {
            match self.control.current_identity_key() {
                Some(key) => {
                    self.crypto
                        .decrypt(&key, message.as_ref(), self.dirs.attachments())
                        .await
                }
                None => warn!("no identity key; attachment left encrypted"),
            }
        }

        let preview_created = if message.preview().is_none() {
            self.preview.execute(message.as_ref()).await
        } else {
            debug!("message already has a preview");
            false
        };

        Ok(DownloadOutcome::Saved {
            file_name,
            preview_created,
        })
    }
}
