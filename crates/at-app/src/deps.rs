//! # Runtime Dependencies / 运行时依赖
//!
//! Parameter grouping for [`AttachmentRuntime`](crate::AttachmentRuntime)
//! construction. Not a builder: no defaults, no hidden logic.
//! 仅用于参数打包，无默认值，无隐藏逻辑。

use std::sync::Arc;

use at_core::ports::{
    ControlPort, CryptoBridgePort, MediaTransformPort, PreviewStorePort, TransferClientPort,
    TransferQueuePort,
};

/// Collaborators of the transfer subsystem. All are required.
pub struct TransferDeps {
    // Media / 媒体
    pub media: Arc<dyn MediaTransformPort>,
    pub preview_store: Arc<dyn PreviewStorePort>,

    // Security / 安全
    pub crypto: Arc<dyn CryptoBridgePort>,

    // Network / 网络
    pub transfer: Arc<dyn TransferClientPort>,
    pub queue: Arc<dyn TransferQueuePort>,

    // Embedding client / 宿主客户端
    pub control: Arc<dyn ControlPort>,
}
