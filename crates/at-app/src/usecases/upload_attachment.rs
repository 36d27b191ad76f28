use std::path::PathBuf;
use std::sync::Arc;

use at_core::media::{ENCRYPTED_MIME, RESIZED_IMAGE_MIME};
use at_core::ports::{
    ControlPort, CryptoBridgePort, MediaTransformPort, OutboundMessage, TransferClientPort,
};
use at_core::{AttachmentError, MimeType, TransferError, TransferStatus};
use tracing::{debug, info, warn};

use super::payload::UploadPayload;
use crate::attachment_dirs::AttachmentDirs;

/// Result of an upload that reached the file host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The message now carries the download URL.
    Uploaded {
        download_url: String,
        resend_requested: bool,
    },
    /// The host accepted the file but returned no download URL.
    MissingDownloadUrl,
}

/// Upload the attachment of an outgoing message.
///
/// Shrinks oversized images, encrypts when the conversation is encrypted,
/// uploads through a fresh slot and records the result on the message.
pub struct UploadAttachmentUseCase {
    media: Arc<dyn MediaTransformPort>,
    crypto: Arc<dyn CryptoBridgePort>,
    transfer: Arc<dyn TransferClientPort>,
    control: Arc<dyn ControlPort>,
    dirs: AttachmentDirs,
    max_image_pixels: u64,
    temp_dir: PathBuf,
}

impl UploadAttachmentUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        media: Arc<dyn MediaTransformPort>,
        crypto: Arc<dyn CryptoBridgePort>,
        transfer: Arc<dyn TransferClientPort>,
        control: Arc<dyn ControlPort>,
        dirs: AttachmentDirs,
        max_image_pixels: u64,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            media,
            crypto,
            transfer,
            control,
            dirs,
            max_image_pixels,
            temp_dir,
        }
    }

    #[tracing::instrument(
        name = "usecase.transfer.upload_attachment.execute",
        skip(self, message),
        fields(message_id = %message.id())
    )]
    pub async fn execute(
        &self,
        message: Arc<dyn OutboundMessage>,
    ) -> Result<UploadOutcome, AttachmentError> {
        let Some(attachment) = message.attachment() else {
            warn!("no attachment in message to upload");
            return Err(AttachmentError::MissingAttachment);
        };

        let source = self.dirs.absolute_file_path(&attachment);
        let mut payload = UploadPayload::original(source);
        let mut mime = attachment.mime_type.clone();

        if mime.is_image() && self.max_image_pixels > 0 {
            let target = MimeType::from(RESIZED_IMAGE_MIME);
            match self
                .media
                .fit_to_area(payload.path(), self.max_image_pixels, &target)
                .await
            {
                Ok(Some(resized)) => {
                    debug!(
                        original = ?resized.original,
                        resized = ?resized.dimensions,
                        "Image exceeds pixel limit; uploading resized copy"
                    );
                    payload = self.write_temp(&resized.bytes).await?;
                    mime = resized.mime_type;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "can't load image");
                    return Err(err.into());
                }
            }
        }

        // If the text is encrypted the attachment is always encrypted too.
        let encrypt = message.content_encryption().needs_encryption();
        if encrypt {
            let key = self.control.current_identity_key();
            let encrypted = match &key {
                Some(key) => self.crypto.encrypt(key, &message.id(), payload.path()).await,
                None => None,
            };
            payload.discard().await;

            match encrypted {
                Some(file) => {
                    payload = UploadPayload::derived(file);
                    mime = MimeType::from(ENCRYPTED_MIME);
                }
                None if key.is_none() => {
                    warn!("no identity key; can't encrypt attachment");
                    return Err(AttachmentError::MissingKey);
                }
                None => {
                    warn!("attachment encryption failed");
                    return Err(AttachmentError::EncryptionFailed);
                }
            }
        }

        let length = match tokio::fs::metadata(payload.path()).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(path = %payload.path().display(), error = %err, "can't read upload file");
                payload.discard().await;
                return Err(err.into());
            }
        };
        let file_name = payload
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(
            file_name = %file_name,
            length,
            mime = %mime,
            derived = payload.is_derived(),
            "Requesting upload slot"
        );
        let slot = match self
            .transfer
            .request_upload_slot(&file_name, length, &mime)
            .await
        {
            Ok(slot) => slot,
            Err(err) => return Err(self.fail(message.as_ref(), &payload, err).await),
        };

        if let Err(err) = self
            .transfer
            .upload(payload.path(), &slot.upload_url, &mime, encrypt)
            .await
        {
            return Err(self.fail(message.as_ref(), &payload, err).await);
        }

        payload.discard().await;

        if slot.download_url.is_empty() {
            warn!(attachment = ?attachment, "url empty");
            return Ok(UploadOutcome::MissingDownloadUrl);
        }

        message.set_upload(&slot.download_url, &mime, length);
        info!(url = %slot.download_url, "upload successful");

        // Only a re-upload triggers a resend, otherwise sending would loop.
        let resend_requested = attachment.has_url();
        if resend_requested {
            self.control.resend_message(message.clone());
        }

        Ok(UploadOutcome::Uploaded {
            download_url: slot.download_url,
            resend_requested,
        })
    }

    async fn fail(
        &self,
        message: &dyn OutboundMessage,
        payload: &UploadPayload,
        err: TransferError,
    ) -> AttachmentError {
        warn!(error = %err, "upload failed");
        message.set_status(TransferStatus::Error);
        self.control.report_failure(&err);
        payload.discard().await;
        err.into()
    }

    async fn write_temp(&self, bytes: &[u8]) -> Result<UploadPayload, AttachmentError> {
        let path = self
            .temp_dir
            .join(format!("at_resized_img_att_{}.dat", uuid::Uuid::new_v4()));
        if let Err(err) = tokio::fs::write(&path, bytes).await {
            warn!(path = %path.display(), error = %err, "can't create temporary file");
            // A partially written file is still ours to remove.
            UploadPayload::derived(path).discard().await;
            return Err(err.into());
        }
        Ok(UploadPayload::derived(path))
    }
}
