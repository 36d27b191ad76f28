use at_core::ports::{TransferQueuePort, TransferTask};
use at_core::QueueError;
use tokio::sync::mpsc;

/// Unbounded FIFO intake feeding the transfer worker.
#[derive(Clone)]
pub struct MpscTransferQueue {
    sender: mpsc::UnboundedSender<TransferTask>,
}

impl MpscTransferQueue {
    pub fn new(sender: mpsc::UnboundedSender<TransferTask>) -> Self {
        Self { sender }
    }

    /// Queue plus the receiver the worker consumes.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TransferTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TransferQueuePort for MpscTransferQueue {
    fn enqueue(&self, task: TransferTask) -> Result<(), QueueError> {
        self.sender.send(task).map_err(|_| QueueError::Closed)
    }
}
