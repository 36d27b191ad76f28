//! Identity key handed out by the control collaborator.
//!
//! This crate never creates or stores key material; it only carries the key
//! from the key provider to the crypto bridge.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const IDENTITY_KEY_LEN: usize = 32;

/// Active identity key of the local user.
///
/// 本地用户当前的身份密钥：
/// - Debug 输出不包含密钥内容
/// - Drop 时清零内存
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct IdentityKey {
    fingerprint: String,
    secret: [u8; IDENTITY_KEY_LEN],
}

impl IdentityKey {
    pub fn new(fingerprint: impl Into<String>, secret: [u8; IDENTITY_KEY_LEN]) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            secret,
        }
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Borrow the raw secret. Only the crypto bridge should call this.
    pub fn expose_secret(&self) -> &[u8; IDENTITY_KEY_LEN] {
        &self.secret
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityKey")
            .field("fingerprint", &self.fingerprint)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for IdentityKey {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.secret == other.secret
    }
}

impl Eq for IdentityKey {}
