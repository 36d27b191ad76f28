//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Iron Rule
//!
//! > **This module contains data only, no validation.**
//! > Missing keys map to empty values; an empty value is a fact, not an error.
//! > The one exception is [`AttachmentConfig::defaults`], the policy values used
//! > when no configuration file exists at all.

use std::path::PathBuf;

use crate::media::MAX_ATTACHMENT_BYTES;

/// Attachment transfer configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentConfig {
    /// Application base directory; empty means "platform data directory".
    pub base_dir: PathBuf,

    /// Directory for resized/encrypted intermediates; empty means "system temp".
    pub temp_dir: PathBuf,

    /// Images with more pixels than this are shrunk before upload; 0 disables.
    pub max_image_pixels: u64,

    /// Files above this size are refused when creating an attachment; 0 disables.
    pub max_attachment_bytes: u64,

    /// Endpoint that hands out upload slots.
    pub slot_endpoint: String,

    /// Connect and idle-read timeout in seconds (not a whole-transfer deadline); 0 disables.
    pub timeout_secs: u64,

    /// Skip TLS certificate validation for the file host.
    pub accept_invalid_certs: bool,
}

impl AttachmentConfig {
    /// Create AttachmentConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Empty strings and zeros are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let u64_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| u64::try_from(v).unwrap_or(0))
                .unwrap_or(0)
        };

        Ok(Self {
            base_dir: PathBuf::from(str_at("storage", "base_dir")),
            temp_dir: PathBuf::from(str_at("storage", "temp_dir")),
            max_image_pixels: u64_at("transfer", "max_image_pixels"),
            max_attachment_bytes: u64_at("attachments", "max_attachment_bytes"),
            slot_endpoint: str_at("transfer", "slot_endpoint"),
            timeout_secs: u64_at("transfer", "timeout_secs"),
            accept_invalid_certs: toml_value
                .get("transfer")
                .and_then(|t| t.get("accept_invalid_certs"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    /// Create empty AttachmentConfig (all empty/zero values)
    pub fn empty() -> Self {
        Self {
            base_dir: PathBuf::new(),
            temp_dir: PathBuf::new(),
            max_image_pixels: 0,
            max_attachment_bytes: 0,
            slot_endpoint: String::new(),
            timeout_secs: 0,
            accept_invalid_certs: false,
        }
    }

    /// Policy defaults used when no configuration file exists.
    pub fn defaults() -> Self {
        Self {
            max_image_pixels: 2_000_000,
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
            timeout_secs: 60,
            ..Self::empty()
        }
    }
}
