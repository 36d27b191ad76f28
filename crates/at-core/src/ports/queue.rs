use std::fmt;
use std::sync::Arc;

use crate::errors::QueueError;
use crate::ids::MessageId;
use crate::ports::{InboundMessage, OutboundMessage};

/// One unit of work for the transfer worker.
#[derive(Clone)]
pub enum TransferTask {
    Upload(Arc<dyn OutboundMessage>),
    Download(Arc<dyn InboundMessage>),
}

impl TransferTask {
    pub fn kind(&self) -> &'static str {
        match self {
            TransferTask::Upload(_) => "upload",
            TransferTask::Download(_) => "download",
        }
    }

    pub fn message_id(&self) -> MessageId {
        match self {
            TransferTask::Upload(message) => message.id(),
            TransferTask::Download(message) => message.id(),
        }
    }
}

impl fmt::Debug for TransferTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferTask")
            .field("kind", &self.kind())
            .field("message_id", &self.message_id())
            .finish()
    }
}

/// FIFO intake of the transfer worker.
///
/// `enqueue` never blocks. It fails only when the worker is gone.
pub trait TransferQueuePort: Send + Sync {
    fn enqueue(&self, task: TransferTask) -> Result<(), QueueError>;
}
