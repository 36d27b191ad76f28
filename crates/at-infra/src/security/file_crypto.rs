//! File encryption for attachments.
//! 附件文件加密。
//!
//! Envelope layout: `MAGIC (4) | nonce (24) | ciphertext + tag`. The magic is
//! also the AEAD associated data.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use at_core::ids::MessageId;
use at_core::ports::{CryptoBridgePort, InboundMessage};
use at_core::{CryptoError, EncryptionState, IdentityKey};
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use tracing::{debug, warn};

const MAGIC: &[u8; 4] = b"ATE1";
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;
const KEY_CONTEXT: &str = "attachment-transfer v1 attachment file key";

/// Crypto bridge sealing whole files with XChaCha20-Poly1305.
///
/// The file key is derived from the identity key with BLAKE3 in key
/// derivation mode, so the identity secret never touches a file directly.
pub struct XChaChaCryptoBridge {
    temp_dir: PathBuf,
}

impl XChaChaCryptoBridge {
    /// Encrypted copies are written to `temp_dir`.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    fn cipher(key: &IdentityKey) -> Result<XChaCha20Poly1305, CryptoError> {
        let file_key = blake3::derive_key(KEY_CONTEXT, key.expose_secret());
        XChaCha20Poly1305::new_from_slice(&file_key).map_err(|_| CryptoError::InvalidKey)
    }

    fn seal(key: &IdentityKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = Self::cipher(key)?
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: MAGIC,
                },
            )
            .map_err(|_| CryptoError::EncryptFailed)?;

        let mut envelope = Vec::with_capacity(MAGIC.len() + NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(MAGIC);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    fn open(key: &IdentityKey, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if envelope.len() < MAGIC.len() + NONCE_LEN + TAG_LEN {
            return Err(CryptoError::UnsupportedEnvelope(format!(
                "{} bytes is too short",
                envelope.len()
            )));
        }
        let (magic, rest) = envelope.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(CryptoError::UnsupportedEnvelope("bad magic".to_string()));
        }
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        Self::cipher(key)?
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: MAGIC,
                },
            )
            .map_err(|_| CryptoError::DecryptFailed)
    }

    async fn encrypt_file(&self, key: &IdentityKey, file: &Path) -> Result<PathBuf, CryptoError> {
        let plaintext = tokio::fs::read(file).await?;
        let envelope = Self::seal(key, &plaintext)?;

        let path = self
            .temp_dir
            .join(format!("at_enc_att_{}.bin", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, envelope).await?;
        Ok(path)
    }

    async fn decrypt_in_place(&self, key: &IdentityKey, path: &Path) -> Result<(), CryptoError> {
        let envelope = tokio::fs::read(path).await?;
        let plaintext = Self::open(key, &envelope)?;

        let mut partial = path.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);
        if let Err(err) = tokio::fs::write(&partial, plaintext).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err.into());
        }
        tokio::fs::rename(&partial, path).await?;
        Ok(())
    }
}

#[async_trait]
impl CryptoBridgePort for XChaChaCryptoBridge {
    async fn encrypt(
        &self,
        key: &IdentityKey,
        message_id: &MessageId,
        file: &Path,
    ) -> Option<PathBuf> {
        match self.encrypt_file(key, file).await {
            Ok(path) => {
                debug!(message_id = %message_id, path = %path.display(), "Attachment encrypted");
                Some(path)
            }
            Err(err) => {
                warn!(
                    message_id = %message_id,
                    file = %file.display(),
                    error = %err,
                    "can't encrypt attachment"
                );
                None
            }
        }
    }

    async fn decrypt(&self, key: &IdentityKey, message: &dyn InboundMessage, attachment_dir: &Path) {
        let Some(attachment) = message.attachment() else {
            warn!(message_id = %message.id(), "no attachment to decrypt");
            return;
        };
        let path = attachment_dir.join(&attachment.file_path);

        match self.decrypt_in_place(key, &path).await {
            Ok(()) => {
                message.set_attachment_encryption(EncryptionState::Decrypted);
                debug!(message_id = %message.id(), "Attachment decrypted");
            }
            Err(err) => warn!(
                message_id = %message.id(),
                path = %path.display(),
                error = %err,
                "can't decrypt attachment"
            ),
        }
    }
}
