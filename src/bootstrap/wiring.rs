//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Resolve the base and temp directories / 解析基础目录与临时目录
//! - ✅ Create the at-infra adapters / 创建 at-infra 层具体实现
//! - ✅ Inject them into [`AttachmentRuntime`] / 注入到 AttachmentRuntime
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! - Do not decide when to encrypt, resize or resend
//! - 不判断何时加密、缩放或重发
//!
//! ❌ **No configuration validation / 禁止做配置验证**
//! - Config already loaded in config.rs
//! - 配置已在 config.rs 加载
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on at-infra and at-app simultaneously.**
//! > **这是唯一允许同时依赖 at-infra 和 at-app 的地方。**

use std::path::PathBuf;
use std::sync::Arc;

use at_app::{AttachmentDirs, AttachmentRuntime, TransferDeps};
use at_core::errors::AppDirsError;
use at_core::ports::{AppDirsPort, ControlPort};
use at_core::AttachmentConfig;
use at_infra::{
    DirsAppDirsAdapter, FsPreviewStore, HttpTransferClient, ImageMediaTransform,
    MpscTransferQueue, XChaChaCryptoBridge,
};
use tracing::info;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Directory setup failed: {0}")]
    Directories(#[from] AppDirsError),

    #[error("Temp directory setup failed for {path}: {source}")]
    TempDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transfer client initialization failed: {0}")]
    TransferClient(String),
}

/// Wire the attachment runtime using the platform data directory as fallback.
/// 使用平台数据目录作为后备来装配附件运行时。
///
/// Must be called from inside a tokio runtime; the worker is spawned here.
pub fn wire_attachment_runtime(
    config: &AttachmentConfig,
    control: Arc<dyn ControlPort>,
) -> WiringResult<AttachmentRuntime> {
    wire_with_app_dirs(config, control, &DirsAppDirsAdapter::new())
}

/// Same as [`wire_attachment_runtime`] with an explicit directory resolver.
pub fn wire_with_app_dirs(
    config: &AttachmentConfig,
    control: Arc<dyn ControlPort>,
    app_dirs: &dyn AppDirsPort,
) -> WiringResult<AttachmentRuntime> {
    let base_dir = resolve_base_dir(config, app_dirs)?;
    let dirs = AttachmentDirs::prepare(&base_dir)?;
    let temp_dir = resolve_temp_dir(config)?;

    let transfer = HttpTransferClient::from_config(config)
        .map_err(|e| WiringError::TransferClient(format!("{e:#}")))?;
    let (queue, rx) = MpscTransferQueue::channel();

    let deps = TransferDeps {
        media: Arc::new(ImageMediaTransform::new()),
        preview_store: Arc::new(FsPreviewStore::new(dirs.previews())),
        crypto: Arc::new(XChaChaCryptoBridge::new(&temp_dir)),
        transfer: Arc::new(transfer),
        queue: Arc::new(queue),
        control,
    };

    info!(
        base_dir = %base_dir.display(),
        temp_dir = %temp_dir.display(),
        slot_endpoint = %config.slot_endpoint,
        "Wiring attachment runtime"
    );

    let mut runtime_config = config.clone();
    runtime_config.temp_dir = temp_dir;
    Ok(AttachmentRuntime::start(deps, rx, dirs, &runtime_config))
}

/// Empty `base_dir` means the platform application data directory.
pub(crate) fn resolve_base_dir(
    config: &AttachmentConfig,
    app_dirs: &dyn AppDirsPort,
) -> WiringResult<PathBuf> {
    if !config.base_dir.as_os_str().is_empty() {
        return Ok(config.base_dir.clone());
    }
    Ok(app_dirs.get_app_dirs()?.app_data_root)
}

/// Empty `temp_dir` means the system temp directory. A configured one is created.
fn resolve_temp_dir(config: &AttachmentConfig) -> WiringResult<PathBuf> {
    if config.temp_dir.as_os_str().is_empty() {
        return Ok(std::env::temp_dir());
    }
    std::fs::create_dir_all(&config.temp_dir).map_err(|source| WiringError::TempDir {
        path: config.temp_dir.clone(),
        source,
    })?;
    Ok(config.temp_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_core::app_dirs::AppDirs;
    use at_core::ports::OutboundMessage;
    use at_core::{IdentityKey, TransferError};
    use std::time::Duration;

    struct FixedAppDirs(PathBuf);

    impl AppDirsPort for FixedAppDirs {
        fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
            Ok(AppDirs {
                app_data_root: self.0.clone(),
            })
        }
    }

    struct NoAppDirs;

    impl AppDirsPort for NoAppDirs {
        fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
            Err(AppDirsError::DataDirUnavailable)
        }
    }

    struct SilentControl;

    impl ControlPort for SilentControl {
        fn current_identity_key(&self) -> Option<IdentityKey> {
            None
        }
        fn report_failure(&self, _error: &TransferError) {}
        fn resend_message(&self, _message: Arc<dyn OutboundMessage>) {}
    }

    fn config_with_endpoint() -> AttachmentConfig {
        AttachmentConfig {
            slot_endpoint: "http://127.0.0.1:9/slot".to_string(),
            ..AttachmentConfig::defaults()
        }
    }

    #[test]
    fn configured_base_dir_wins_over_platform_dir() {
        let config = AttachmentConfig {
            base_dir: PathBuf::from("/srv/chat"),
            ..AttachmentConfig::empty()
        };

        let base = resolve_base_dir(&config, &NoAppDirs).unwrap();

        assert_eq!(base, PathBuf::from("/srv/chat"));
    }

    #[test]
    fn missing_platform_dir_is_a_wiring_error() {
        let err = resolve_base_dir(&AttachmentConfig::empty(), &NoAppDirs).unwrap_err();

        assert!(matches!(
            err,
            WiringError::Directories(AppDirsError::DataDirUnavailable)
        ));
    }

    #[test]
    fn configured_temp_dir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let config = AttachmentConfig {
            temp_dir: root.path().join("scratch"),
            ..AttachmentConfig::empty()
        };

        let temp = resolve_temp_dir(&config).unwrap();

        assert!(temp.is_dir());
        assert_eq!(resolve_temp_dir(&AttachmentConfig::empty()).unwrap(), std::env::temp_dir());
    }

    #[tokio::test]
    async fn wiring_prepares_layout_under_platform_dir() {
        let root = tempfile::tempdir().unwrap();
        let app_dirs = FixedAppDirs(root.path().join("app"));

        let runtime =
            wire_with_app_dirs(&config_with_endpoint(), Arc::new(SilentControl), &app_dirs)
                .unwrap();

        assert_eq!(runtime.dirs().attachments(), root.path().join("app/attachments"));
        assert!(runtime.dirs().attachments().is_dir());
        assert!(runtime.dirs().previews().is_dir());

        runtime.shutdown(Duration::from_secs(1)).await;
    }
}
