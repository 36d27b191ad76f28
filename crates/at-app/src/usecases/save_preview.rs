use std::sync::Arc;

use at_core::media::extension_for_mime;
use at_core::ports::{InboundMessage, PreviewStorePort};
use tracing::{debug, warn};

use crate::attachment_dirs::inline_preview_file_name;

/// Persist a preview that arrived with the message.
pub struct SavePreviewUseCase {
    previews: Arc<dyn PreviewStorePort>,
}

impl SavePreviewUseCase {
    pub fn new(previews: Arc<dyn PreviewStorePort>) -> Self {
        Self { previews }
    }

    #[tracing::instrument(
        name = "usecase.preview.save_preview.execute",
        skip(self, message),
        fields(message_id = %message.id())
    )]
    pub async fn execute<M>(&self, message: &M) -> bool
    where
        M: InboundMessage + ?Sized,
    {
        let Some(preview) = message.preview() else {
            warn!("message has no preview to save");
            return false;
        };

        let file_name =
            inline_preview_file_name(&message.id(), &extension_for_mime(&preview.mime_type));
        match self.previews.write(&file_name, &preview.data).await {
            Ok(path) => {
                debug!(path = %path.display(), "Preview saved");
                message.set_preview_filename(&file_name);
                true
            }
            Err(err) => {
                warn!(file_name = %file_name, error = %err, "can't save preview");
                false
            }
        }
    }
}
