//! Attachment runtime: the handle the messaging client holds.
//!
//! Owns the directory layout, the queue intake and the worker task. There is
//! no global instance; the client creates one runtime and passes it around.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use at_core::ports::{
    AttachmentMessage, InboundMessage, OutboundMessage, TransferQueuePort, TransferTask,
};
use at_core::{Attachment, AttachmentConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::attachment_dirs::AttachmentDirs;
use crate::deps::TransferDeps;
use crate::usecases::{
    CreateAttachmentUseCase, CreateImagePreviewUseCase, DownloadAttachmentUseCase,
    SavePreviewUseCase, UploadAttachmentUseCase,
};
use crate::worker::TransferWorker;

pub struct AttachmentRuntime {
    dirs: AttachmentDirs,
    queue: Arc<dyn TransferQueuePort>,
    preview: Arc<CreateImagePreviewUseCase>,
    save_preview: SavePreviewUseCase,
    create_attachment: CreateAttachmentUseCase,
    cancel: CancellationToken,
    worker: JoinHandle<()>,
}

impl AttachmentRuntime {
    /// Wire the use cases and spawn the worker on the current tokio runtime.
    ///
    /// `rx` must be the receiving half of the channel behind `deps.queue`.
    /// `dirs` must already exist, see [`AttachmentDirs::prepare`].
    pub fn start(
        deps: TransferDeps,
        rx: mpsc::UnboundedReceiver<TransferTask>,
        dirs: AttachmentDirs,
        config: &AttachmentConfig,
    ) -> Self {
        let temp_dir = if config.temp_dir.as_os_str().is_empty() {
            std::env::temp_dir()
        } else {
            config.temp_dir.clone()
        };

        let preview = Arc::new(CreateImagePreviewUseCase::new(
            deps.media.clone(),
            deps.preview_store.clone(),
            dirs.clone(),
        ));
        let upload = Arc::new(UploadAttachmentUseCase::new(
            deps.media.clone(),
            deps.crypto.clone(),
            deps.transfer.clone(),
            deps.control.clone(),
            dirs.clone(),
            config.max_image_pixels,
            temp_dir,
        ));
        let download = Arc::new(DownloadAttachmentUseCase::new(
            deps.crypto,
            deps.transfer,
            deps.control,
            preview.clone(),
            dirs.clone(),
        ));

        let cancel = CancellationToken::new();
        let worker = TransferWorker::new(rx, upload, download, cancel.clone());
        let worker = tokio::spawn(worker.run());
        info!(
            attachments = %dirs.attachments().display(),
            previews = %dirs.previews().display(),
            "Attachment runtime started"
        );

        Self {
            dirs,
            queue: deps.queue,
            save_preview: SavePreviewUseCase::new(deps.preview_store),
            create_attachment: CreateAttachmentUseCase::new(
                deps.media,
                config.max_attachment_bytes,
            ),
            preview,
            cancel,
            worker,
        }
    }

    pub fn dirs(&self) -> &AttachmentDirs {
        &self.dirs
    }

    /// Queue the attachment of `message` for upload. Never blocks.
    pub fn queue_upload(&self, message: Arc<dyn OutboundMessage>) {
        self.enqueue(TransferTask::Upload(message));
    }

    /// Queue the attachment of `message` for download. Never blocks.
    pub fn queue_download(&self, message: Arc<dyn InboundMessage>) {
        self.enqueue(TransferTask::Download(message));
    }

    fn enqueue(&self, task: TransferTask) {
        if let Err(err) = self.queue.enqueue(task.clone()) {
            warn!(
                kind = task.kind(),
                message_id = %task.message_id(),
                error = %err,
                "Dropping transfer task"
            );
        }
    }

    /// Persist a preview that arrived with `message`.
    pub async fn save_preview(&self, message: &dyn InboundMessage) -> bool {
        self.save_preview.execute(message).await
    }

    /// Render and attach a thumbnail if the attachment is a large enough image.
    pub async fn may_create_image_preview(&self, message: &dyn AttachmentMessage) -> bool {
        self.preview.execute(message).await
    }

    pub async fn create_attachment(&self, path: &Path) -> Option<Attachment> {
        self.create_attachment.execute(path).await
    }

    pub fn absolute_file_path(&self, attachment: &Attachment) -> PathBuf {
        self.dirs.absolute_file_path(attachment)
    }

    pub fn image_preview_path(&self, message: &dyn AttachmentMessage) -> Option<PathBuf> {
        self.dirs.image_preview_path(message)
    }

    /// Stop taking tasks and wait up to `grace` for the one in flight.
    ///
    /// A task still running after `grace` is detached, not aborted.
    pub async fn shutdown(self, grace: Duration) {
        self.cancel.cancel();
        match tokio::time::timeout(grace, self.worker).await {
            Ok(Ok(())) => info!("Attachment runtime stopped"),
            Ok(Err(err)) => error!(error = %err, "Transfer worker panicked"),
            Err(_) => warn!(
                grace_ms = grace.as_millis() as u64,
                "Transfer worker still busy; detaching"
            ),
        }
    }
}
