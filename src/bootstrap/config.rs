//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into AttachmentConfig DTO / 将 TOML 解析为 AttachmentConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No business rules / 禁止业务规则**
//!
//! ## Iron Rule / 铁律
//!
//! > **Accept whatever is in the file.** Policy defaults apply only when there
//! > is no file at all, see [`load_config_or_defaults`].
//! > **接受文件中的任何内容。** 仅当文件不存在时才使用默认策略值。

use anyhow::Context;
use at_core::AttachmentConfig;
use std::path::PathBuf;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// **NO validation is performed**: missing keys map to empty values and
/// zeros, which downstream code reads as "disabled" or "use the platform
/// location".
/// **不执行任何验证**：缺失的键映射为空值或零。
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
/// 无法读取文件或内容不是有效 TOML 时返回错误。
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AttachmentConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AttachmentConfig::from_toml(&toml_value)
}

/// Load `config_path` if it exists, otherwise return [`AttachmentConfig::defaults`].
/// 文件存在则加载，否则返回默认配置。
///
/// An existing but unreadable or malformed file is still an error.
pub fn load_config_or_defaults(config_path: PathBuf) -> anyhow::Result<AttachmentConfig> {
    if !config_path.exists() {
        tracing::info!(
            path = %config_path.display(),
            "No config file, using defaults"
        );
        return Ok(AttachmentConfig::defaults());
    }
    load_config(config_path)
}
