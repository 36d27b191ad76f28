use std::sync::Arc;

use at_core::media::{extension_for_mime, THUMBNAIL_BOUNDS, THUMBNAIL_MIME};
use at_core::ports::{AttachmentMessage, MediaTransformPort, PreviewStorePort};
use at_core::{MimeType, Preview};
use tracing::{debug, warn};

use crate::attachment_dirs::{generated_preview_file_name, AttachmentDirs};

/// Render and attach a thumbnail for a message's image attachment.
///
/// Returns `true` only when a preview was written and attached. Images that
/// already fit the thumbnail bounds get no preview.
pub struct CreateImagePreviewUseCase {
    media: Arc<dyn MediaTransformPort>,
    previews: Arc<dyn PreviewStorePort>,
    dirs: AttachmentDirs,
}

impl CreateImagePreviewUseCase {
    pub fn new(
        media: Arc<dyn MediaTransformPort>,
        previews: Arc<dyn PreviewStorePort>,
        dirs: AttachmentDirs,
    ) -> Self {
        Self {
            media,
            previews,
            dirs,
        }
    }

    #[tracing::instrument(
        name = "usecase.preview.create_image_preview.execute",
        skip(self, message),
        fields(message_id = %message.id())
    )]
    pub async fn execute<M>(&self, message: &M) -> bool
    where
        M: AttachmentMessage + ?Sized,
    {
        let Some(attachment) = message.attachment() else {
            warn!("no attachment in message");
            return false;
        };
        let path = self.dirs.absolute_file_path(&attachment);

        let mime = if attachment.mime_type.is_empty() {
            self.media.probe_mime(&path).await
        } else {
            Some(attachment.mime_type.clone())
        };
        match mime {
            Some(mime) if mime.is_image() => {}
            other => {
                debug!(mime = ?other, "not an image; no preview");
                return false;
            }
        }

        let output = MimeType::from(THUMBNAIL_MIME);
        let image = match self.media.thumbnail(&path, THUMBNAIL_BOUNDS, &output).await {
            Ok(Some(image)) if !image.bytes.is_empty() => image,
            Ok(Some(_)) => {
                warn!("thumbnail encoder produced no data");
                return false;
            }
            Ok(None) => {
                debug!("image fits thumbnail bounds; preview not needed");
                return false;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "can't create preview");
                return false;
            }
        };

        let file_name =
            generated_preview_file_name(&message.id(), &extension_for_mime(&image.mime_type));
        if let Err(err) = self.previews.write(&file_name, &image.bytes).await {
            warn!(file_name = %file_name, error = %err, "can't write preview");
            return false;
        }

        debug!(
            file_name = %file_name,
            width = image.dimensions.width,
            height = image.dimensions.height,
            "Preview created"
        );
        message.set_preview(Preview::new(image.bytes, file_name, image.mime_type));
        true
    }
}
