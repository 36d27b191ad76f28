//! Use cases of the attachment transfer subsystem.

mod create_attachment;
mod create_image_preview;
mod download_attachment;
mod payload;
mod save_preview;
mod upload_attachment;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_attachment::CreateAttachmentUseCase;
pub use create_image_preview::CreateImagePreviewUseCase;
pub use download_attachment::{DownloadAttachmentUseCase, DownloadOutcome};
pub use save_preview::SavePreviewUseCase;
pub use upload_attachment::{UploadAttachmentUseCase, UploadOutcome};
