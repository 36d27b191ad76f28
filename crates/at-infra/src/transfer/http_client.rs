//! HTTP file-host client.
//!
//! Slots come from a JSON endpoint answering
//! `GET <endpoint>?filename=..&size=..&content_type=..` with
//! `{ "put": "<upload url>", "get": "<download url>" }`. Files go up with a
//! streamed `PUT` and come down with a streamed `GET`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use at_core::ports::{ProgressFn, TransferClientPort};
use at_core::{AttachmentConfig, MimeType, Slot, TransferError};
use futures_util::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Response, Url};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

const FALLBACK_FILE_NAME: &str = "attachment";

#[derive(Debug, Deserialize)]
struct SlotResponse {
    put: String,
    #[serde(default)]
    get: String,
}

pub struct HttpTransferClient {
    http: reqwest::Client,
    slot_endpoint: String,
}

impl HttpTransferClient {
    /// Build a client. `timeout_secs` bounds connecting and each wait for
    /// data, not the whole transfer, so large files on slow links still
    /// finish. Zero disables both.
    pub fn new(
        slot_endpoint: impl Into<String>,
        timeout_secs: u64,
        accept_invalid_certs: bool,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if timeout_secs > 0 {
            let idle = Duration::from_secs(timeout_secs);
            builder = builder.connect_timeout(idle).read_timeout(idle);
        }
        if accept_invalid_certs {
            warn!("TLS certificate validation disabled for file host");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            http,
            slot_endpoint: slot_endpoint.into(),
        })
    }

    pub fn from_config(config: &AttachmentConfig) -> anyhow::Result<Self> {
        Self::new(
            config.slot_endpoint.clone(),
            config.timeout_secs,
            config.accept_invalid_certs,
        )
    }
}

#[async_trait]
impl TransferClientPort for HttpTransferClient {
    async fn request_upload_slot(
        &self,
        file_name: &str,
        length: u64,
        mime_type: &MimeType,
    ) -> Result<Slot, TransferError> {
        if self.slot_endpoint.is_empty() {
            return Err(TransferError::InvalidUrl("no upload slot endpoint configured".to_string()));
        }
        let endpoint = parse_url(&self.slot_endpoint)?;

        let response = self
            .http
            .get(endpoint)
            .query(&[
                ("filename", file_name.to_string()),
                ("size", length.to_string()),
                ("content_type", mime_type.to_string()),
            ])
            .send()
            .await
            .map_err(network_error)?;
        let response = check_status(response)?;

        let slot: SlotResponse = response
            .json()
            .await
            .map_err(|err| TransferError::MalformedSlot(err.to_string()))?;
        if slot.put.is_empty() {
            return Err(TransferError::MalformedSlot("missing upload url".to_string()));
        }
        debug!(put = %slot.put, get = %slot.get, "Upload slot granted");
        Ok(Slot::new(slot.put, slot.get))
    }

    async fn upload(
        &self,
        file: &Path,
        url: &str,
        mime_type: &MimeType,
        encrypted: bool,
    ) -> Result<(), TransferError> {
        let url = parse_url(url)?;
        let handle = tokio::fs::File::open(file).await?;
        let length = handle.metadata().await?.len();
        // Ciphertext is opaque to the host whatever the payload type.
        let content_type = if encrypted {
            MimeType::octet_stream()
        } else {
            mime_type.clone()
        };

        let response = self
            .http
            .put(url.clone())
            .header(CONTENT_TYPE, content_type.as_str())
            .header(CONTENT_LENGTH, length)
            .body(Body::wrap_stream(ReaderStream::new(handle)))
            .send()
            .await
            .map_err(network_error)?;
        check_status(response)?;

        info!(url = %url, length, encrypted, "Upload finished");
        Ok(())
    }

    async fn download(
        &self,
        url: &str,
        destination_dir: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<PathBuf, TransferError> {
        let parsed = parse_url(url)?;
        let response = self
            .http
            .get(parsed.clone())
            .send()
            .await
            .map_err(network_error)?;
        let response = check_status(response)?;
        let total = response.content_length().unwrap_or(0);

        let (path, mut file) = create_unique(destination_dir, &file_name_from_url(&parsed)).await?;
        let result = async {
            let mut stream = response.bytes_stream();
            let mut received: u64 = 0;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(network_error)?;
                file.write_all(&chunk).await?;
                received += chunk.len() as u64;
                if total > 0 {
                    progress((received.saturating_mul(100) / total).min(100) as u8);
                }
            }
            file.flush().await?;
            Ok::<u64, TransferError>(received)
        }
        .await;

        match result {
            Ok(received) => {
                progress(100);
                debug!(path = %path.display(), received, "Download finished");
                Ok(path)
            }
            Err(err) => {
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %remove_err, "can't remove partial download");
                }
                Err(err)
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url, TransferError> {
    Url::parse(url).map_err(|err| TransferError::InvalidUrl(format!("{url}: {err}")))
}

fn network_error(err: reqwest::Error) -> TransferError {
    TransferError::Network(err.to_string())
}

fn check_status(response: Response) -> Result<Response, TransferError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransferError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

/// Last path segment of `url`, reduced to characters safe in a file name.
fn file_name_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = name.trim_start_matches('.');
    if name.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Create a new file named `name` in `dir`, adding `-N` before the extension
/// while the name is taken.
async fn create_unique(dir: &Path, name: &str) -> Result<(PathBuf, tokio::fs::File), TransferError> {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let mut attempt: u32 = 0;
    loop {
        let candidate = match (attempt, extension) {
            (0, _) => name.to_string(),
            (n, Some(ext)) => format!("{stem}-{n}.{ext}"),
            (n, None) => format!("{stem}-{n}"),
        };
        let path = dir.join(candidate);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
