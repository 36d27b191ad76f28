use std::path::Path;
use std::sync::Arc;

use at_core::ports::MediaTransformPort;
use at_core::Attachment;
use tracing::warn;

/// Build an attachment for a local file the user picked.
///
/// The file must be readable, within the size limit and of a recognizable
/// type. A limit of zero disables the size check.
pub struct CreateAttachmentUseCase {
    media: Arc<dyn MediaTransformPort>,
    max_attachment_bytes: u64,
}

impl CreateAttachmentUseCase {
    pub fn new(media: Arc<dyn MediaTransformPort>, max_attachment_bytes: u64) -> Self {
        Self {
            media,
            max_attachment_bytes,
        }
    }

    #[tracing::instrument(
        name = "usecase.attachment.create_attachment.execute",
        skip(self),
        fields(path = %path.display())
    )]
    pub async fn execute(&self, path: &Path) -> Option<Attachment> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                warn!("not a regular file");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "file not found");
                return None;
            }
        };

        if let Err(err) = tokio::fs::File::open(path).await {
            warn!(error = %err, "file not readable");
            return None;
        }

        let length = metadata.len();
        if self.max_attachment_bytes > 0 && length > self.max_attachment_bytes {
            warn!(
                length,
                max = self.max_attachment_bytes,
                "attachment too big"
            );
            return None;
        }

        let Some(mime_type) = self.media.probe_mime(path).await else {
            warn!("unknown MIME type");
            return None;
        };

        let mut attachment = Attachment::new(path, mime_type);
        attachment.length = length;
        Some(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::FakeMedia;
    use at_core::MimeType;

    fn media_probing(mime: Option<&str>) -> Arc<FakeMedia> {
        let media = Arc::new(FakeMedia::default());
        media.set_probed(mime.map(MimeType::from));
        media
    }

    #[tokio::test]
    async fn readable_file_with_known_type_becomes_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let attachment = CreateAttachmentUseCase::new(media_probing(Some("image/png")), 1024)
            .execute(&path)
            .await
            .unwrap();

        assert_eq!(attachment.file_path, path);
        assert_eq!(attachment.mime_type, MimeType::from("image/png"));
        assert_eq!(attachment.length, 16);
        assert!(attachment.url.is_none());
    }

    #[tokio::test]
    async fn missing_file_and_unknown_type_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = CreateAttachmentUseCase::new(media_probing(None), 1024);

        assert!(use_case.execute(&dir.path().join("absent")).await.is_none());
        assert!(use_case.execute(dir.path()).await.is_none());

        let path = dir.path().join("blob");
        std::fs::write(&path, b"??").unwrap();
        assert!(use_case.execute(&path).await.is_none());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 33]).unwrap();

        let media = media_probing(Some("application/octet-stream"));
        assert!(CreateAttachmentUseCase::new(media.clone(), 32)
            .execute(&path)
            .await
            .is_none());
        assert!(CreateAttachmentUseCase::new(media, 0)
            .execute(&path)
            .await
            .is_some());
    }
}
