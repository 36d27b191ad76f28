//! In-memory port doubles for use case tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use at_core::ports::{
    AttachmentMessage, ControlPort, CryptoBridgePort, EncodedImage, InboundMessage,
    MediaTransformPort, OutboundMessage, PreviewStorePort, ProgressFn, TransferClientPort,
};
use at_core::{
    Attachment, Dimensions, EncryptionState, IdentityKey, MediaError, MessageId, MimeType,
    Preview, Slot, TransferError, TransferStatus,
};

mockall::mock! {
    pub Control {}

    impl ControlPort for Control {
        fn current_identity_key(&self) -> Option<IdentityKey>;
        fn report_failure(&self, error: &TransferError);
        fn resend_message(&self, message: Arc<dyn OutboundMessage>);
    }
}

pub fn encoded_image(
    bytes: &[u8],
    mime: &str,
    dimensions: Dimensions,
    original: Dimensions,
) -> EncodedImage {
    EncodedImage {
        bytes: bytes.to_vec(),
        mime_type: MimeType::from(mime),
        dimensions,
        original,
    }
}

#[derive(Debug, Default)]
pub struct MessageState {
    pub attachment: Option<Attachment>,
    pub preview: Option<Preview>,
    pub content_encryption: EncryptionState,
    pub status: TransferStatus,
    pub progress: Vec<u8>,
    pub preview_filename: Option<String>,
}

/// Message double implementing both directions.
pub struct FakeMessage {
    id: MessageId,
    state: Mutex<MessageState>,
}

impl FakeMessage {
    fn build(id: &str, attachment: Option<Attachment>) -> Arc<Self> {
        Arc::new(Self {
            id: MessageId::from(id),
            state: Mutex::new(MessageState {
                attachment,
                ..MessageState::default()
            }),
        })
    }

    pub fn outbound(id: &str, attachment: Attachment) -> Arc<Self> {
        Self::build(id, Some(attachment))
    }

    pub fn inbound(id: &str, attachment: Attachment) -> Arc<Self> {
        Self::build(id, Some(attachment))
    }

    pub fn without_attachment(id: &str) -> Arc<Self> {
        Self::build(id, None)
    }

    pub fn set_content_encryption(&self, state: EncryptionState) {
        self.state().content_encryption = state;
    }

    pub fn state(&self) -> MutexGuard<'_, MessageState> {
        self.state.lock().unwrap()
    }
}

impl AttachmentMessage for FakeMessage {
    fn id(&self) -> MessageId {
        self.id.clone()
    }

    fn attachment(&self) -> Option<Attachment> {
        self.state().attachment.clone()
    }

    fn preview(&self) -> Option<Preview> {
        self.state().preview.clone()
    }

    fn set_preview(&self, preview: Preview) {
        self.state().preview = Some(preview);
    }
}

impl OutboundMessage for FakeMessage {
    fn content_encryption(&self) -> EncryptionState {
        self.state().content_encryption
    }

    fn set_status(&self, status: TransferStatus) {
        self.state().status = status;
    }

    fn set_upload(&self, url: &str, mime_type: &MimeType, length: u64) {
        if let Some(attachment) = self.state().attachment.as_mut() {
            attachment.url = Some(url.to_string());
            attachment.mime_type = mime_type.clone();
            attachment.length = length;
        }
    }
}

impl InboundMessage for FakeMessage {
    fn set_download_progress(&self, percent: u8) {
        self.state().progress.push(percent);
    }

    fn set_attachment_file_name(&self, file_name: &str) {
        if let Some(attachment) = self.state().attachment.as_mut() {
            attachment.file_path = PathBuf::from(file_name);
        }
    }

    fn set_attachment_encryption(&self, state: EncryptionState) {
        if let Some(attachment) = self.state().attachment.as_mut() {
            attachment.encryption = state;
        }
    }

    fn set_preview_filename(&self, file_name: &str) {
        self.state().preview_filename = Some(file_name.to_string());
        if let Some(preview) = self.state().preview.as_mut() {
            preview.filename = file_name.to_string();
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadCall {
    pub url: String,
    pub bytes: Vec<u8>,
    pub mime: MimeType,
    pub encrypted: bool,
}

/// Transfer client that records uploads and serves one canned download.
pub struct FakeTransfer {
    slot: Mutex<Slot>,
    fail_slots: AtomicBool,
    fail_uploads: AtomicBool,
    uploads: Mutex<Vec<UploadCall>>,
    download: Mutex<Option<(String, Vec<u8>)>>,
    progress_steps: Mutex<Vec<u8>>,
    downloads: Mutex<Vec<String>>,
}

impl FakeTransfer {
    pub fn with_slot(slot: Slot) -> Self {
        Self {
            slot: Mutex::new(slot),
            fail_slots: AtomicBool::new(false),
            fail_uploads: AtomicBool::new(false),
            uploads: Mutex::new(Vec::new()),
            download: Mutex::new(None),
            progress_steps: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn serving(file_name: &str, bytes: &[u8]) -> Self {
        let transfer = Self::with_slot(Slot::default());
        *transfer.download.lock().unwrap() = Some((file_name.to_string(), bytes.to_vec()));
        transfer
    }

    pub fn set_slot(&self, slot: Slot) {
        *self.slot.lock().unwrap() = slot;
    }

    pub fn set_progress_steps(&self, steps: &[u8]) {
        *self.progress_steps.lock().unwrap() = steps.to_vec();
    }

    pub fn fail_slots(&self) {
        self.fail_slots.store(true, Ordering::SeqCst);
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransferClientPort for FakeTransfer {
    async fn request_upload_slot(
        &self,
        _file_name: &str,
        _length: u64,
        _mime_type: &MimeType,
    ) -> Result<Slot, TransferError> {
        if self.fail_slots.load(Ordering::SeqCst) {
            return Err(TransferError::Status {
                status: 503,
                url: "https://up.example.org/slot".to_string(),
            });
        }
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn upload(
        &self,
        file: &Path,
        url: &str,
        mime_type: &MimeType,
        encrypted: bool,
    ) -> Result<(), TransferError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(TransferError::Network("connection reset".to_string()));
        }
        let bytes = std::fs::read(file)?;
        self.uploads.lock().unwrap().push(UploadCall {
            url: url.to_string(),
            bytes,
            mime: mime_type.clone(),
            encrypted,
        });
        Ok(())
    }

    async fn download(
        &self,
        url: &str,
        destination_dir: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<PathBuf, TransferError> {
        self.downloads.lock().unwrap().push(url.to_string());
        let Some((file_name, bytes)) = self.download.lock().unwrap().clone() else {
            return Err(TransferError::Status {
                status: 404,
                url: url.to_string(),
            });
        };
        let steps = self.progress_steps.lock().unwrap().clone();
        for step in steps {
            progress(step);
        }
        if file_name.is_empty() {
            return Ok(PathBuf::new());
        }
        let path = destination_dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Crypto bridge that prefixes ciphertext with `ENC:`.
pub struct FakeCrypto {
    temp_dir: PathBuf,
    fail_encrypt: AtomicBool,
    decrypt_calls: AtomicUsize,
}

impl FakeCrypto {
    pub fn new(temp_dir: &Path) -> Self {
        Self {
            temp_dir: temp_dir.to_path_buf(),
            fail_encrypt: AtomicBool::new(false),
            decrypt_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_encrypt(&self) {
        self.fail_encrypt.store(true, Ordering::SeqCst);
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CryptoBridgePort for FakeCrypto {
    async fn encrypt(
        &self,
        _key: &IdentityKey,
        message_id: &MessageId,
        file: &Path,
    ) -> Option<PathBuf> {
        if self.fail_encrypt.load(Ordering::SeqCst) {
            return None;
        }
        let mut bytes = b"ENC:".to_vec();
        bytes.extend(std::fs::read(file).ok()?);
        let path = self.temp_dir.join(format!("{message_id}.enc"));
        std::fs::write(&path, bytes).ok()?;
        Some(path)
    }

    async fn decrypt(&self, _key: &IdentityKey, message: &dyn InboundMessage, attachment_dir: &Path) {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        let Some(attachment) = message.attachment() else {
            return;
        };
        let path = attachment_dir.join(&attachment.file_path);
        let Ok(bytes) = std::fs::read(&path) else {
            return;
        };
        let Some(plain) = bytes.strip_prefix(b"ENC:") else {
            return;
        };
        if std::fs::write(&path, plain).is_ok() {
            message.set_attachment_encryption(EncryptionState::Decrypted);
        }
    }
}

/// Media transform returning canned results.
#[derive(Default)]
pub struct FakeMedia {
    probed: Mutex<Option<MimeType>>,
    resized: Mutex<Option<EncodedImage>>,
    thumbnail: Mutex<Option<EncodedImage>>,
    fail_decode: AtomicBool,
    fit_calls: AtomicUsize,
    thumbnail_calls: AtomicUsize,
}

impl FakeMedia {
    pub fn set_probed(&self, mime: Option<MimeType>) {
        *self.probed.lock().unwrap() = mime;
    }

    pub fn set_resized(&self, image: Option<EncodedImage>) {
        *self.resized.lock().unwrap() = image;
    }

    pub fn set_thumbnail(&self, image: Option<EncodedImage>) {
        *self.thumbnail.lock().unwrap() = image;
    }

    pub fn fail_decode(&self) {
        self.fail_decode.store(true, Ordering::SeqCst);
    }

    pub fn fit_calls(&self) -> usize {
        self.fit_calls.load(Ordering::SeqCst)
    }

    pub fn thumbnail_calls(&self) -> usize {
        self.thumbnail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaTransformPort for FakeMedia {
    async fn probe_mime(&self, _path: &Path) -> Option<MimeType> {
        self.probed.lock().unwrap().clone()
    }

    async fn fit_to_area(
        &self,
        _path: &Path,
        _max_pixels: u64,
        _output: &MimeType,
    ) -> Result<Option<EncodedImage>, MediaError> {
        self.fit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_decode.load(Ordering::SeqCst) {
            return Err(MediaError::Decode("unsupported format".to_string()));
        }
        Ok(self.resized.lock().unwrap().clone())
    }

    async fn thumbnail(
        &self,
        _path: &Path,
        _bounds: Dimensions,
        _output: &MimeType,
    ) -> Result<Option<EncodedImage>, MediaError> {
        self.thumbnail_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_decode.load(Ordering::SeqCst) {
            return Err(MediaError::Decode("unsupported format".to_string()));
        }
        Ok(self.thumbnail.lock().unwrap().clone())
    }
}

/// Preview store writing into a real directory.
pub struct DirPreviewStore {
    dir: PathBuf,
    fail: AtomicBool,
    writes: AtomicUsize,
}

impl DirPreviewStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            fail: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn fail_writes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PreviewStorePort for DirPreviewStore {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}
