use std::fmt;

use super::MimeType;

/// Small rendered representation of an attachment, stored apart from the file.
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: MimeType,
}

impl Preview {
    pub fn new(data: Vec<u8>, filename: impl Into<String>, mime_type: MimeType) -> Self {
        Self {
            data,
            filename: filename.into(),
            mime_type,
        }
    }
}

// Payload bytes are elided; previews end up in log lines.
impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}
