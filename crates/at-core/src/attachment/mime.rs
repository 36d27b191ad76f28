use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// MIME type as reported by the message metadata or a file probe.
///
/// An empty value is a legitimate fact: it means "unknown", not "binary".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn image_jpeg() -> Self {
        Self("image/jpeg".into())
    }

    pub fn octet_stream() -> Self {
        Self("application/octet-stream".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Any `image*` type counts, matching what the remote clients send.
    pub fn is_image(&self) -> bool {
        self.0.starts_with("image")
    }

    /// Subtype after the slash, e.g. `png` for `image/png`.
    pub fn subtype(&self) -> Option<&str> {
        self.0
            .split_once('/')
            .map(|(_, sub)| sub.split(';').next().unwrap_or(sub).trim())
            .filter(|sub| !sub.is_empty())
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MimeType(s.to_string()))
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        MimeType(s.to_string())
    }
}
