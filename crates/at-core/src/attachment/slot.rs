use serde::{Deserialize, Serialize};

/// Upload/download URL pair issued by the file-hosting service for one upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub upload_url: String,
    pub download_url: String,
}

impl Slot {
    pub fn new(upload_url: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            upload_url: upload_url.into(),
            download_url: download_url.into(),
        }
    }
}
