//! Single consumer of the transfer queue.
//! 传输队列的唯一消费者。

use std::sync::Arc;

use at_core::ports::TransferTask;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::usecases::{DownloadAttachmentUseCase, UploadAttachmentUseCase};

/// Processes transfer tasks one at a time in submission order.
///
/// A dequeued task always runs to completion; cancellation is only observed
/// between tasks. Failed tasks are logged and dropped, never requeued.
pub struct TransferWorker {
    rx: mpsc::UnboundedReceiver<TransferTask>,
    upload: Arc<UploadAttachmentUseCase>,
    download: Arc<DownloadAttachmentUseCase>,
    cancel: CancellationToken,
}

impl TransferWorker {
    pub fn new(
        rx: mpsc::UnboundedReceiver<TransferTask>,
        upload: Arc<UploadAttachmentUseCase>,
        download: Arc<DownloadAttachmentUseCase>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            rx,
            upload,
            download,
            cancel,
        }
    }

    /// Run until cancelled or until every queue handle is dropped.
    pub async fn run(mut self) {
        info!("Transfer worker started");
        loop {
            let task = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("Transfer worker cancelled");
                    break;
                }
                task = self.rx.recv() => task,
            };
            let Some(task) = task else {
                info!("Transfer queue closed");
                break;
            };

            let span = info_span!(
                "app.transfer_worker.task",
                kind = task.kind(),
                message_id = %task.message_id(),
            );
            self.process(task).instrument(span).await;
        }
    }

    async fn process(&self, task: TransferTask) {
        match task {
            TransferTask::Upload(message) => match self.upload.execute(message).await {
                Ok(outcome) => debug!(?outcome, "Upload task finished"),
                Err(err) => warn!(error = %err, "Upload task abandoned"),
            },
            TransferTask::Download(message) => match self.download.execute(message).await {
                Ok(outcome) => debug!(?outcome, "Download task finished"),
                Err(err) => warn!(error = %err, "Download task abandoned"),
            },
        }
    }
}
