use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// File handed to the transfer client, remembering whether this subsystem
/// created it.
///
/// Only derived files (resized or encrypted intermediates) are ever deleted;
/// the user's source file is never touched.
#[derive(Debug)]
pub(crate) struct UploadPayload {
    path: PathBuf,
    derived: bool,
}

impl UploadPayload {
    pub(crate) fn original(path: PathBuf) -> Self {
        Self {
            path,
            derived: false,
        }
    }

    pub(crate) fn derived(path: PathBuf) -> Self {
        Self {
            path,
            derived: true,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn is_derived(&self) -> bool {
        self.derived
    }

    /// Delete the file if it is derived. Best effort.
    pub(crate) async fn discard(&self) {
        if !self.derived {
            return;
        }
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed intermediate file"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "Failed to remove intermediate file"
            ),
        }
    }
}
