use std::path::PathBuf;

use at_core::app_dirs::AppDirs;
use at_core::errors::AppDirsError;
use at_core::ports::AppDirsPort;

const APP_DIR_NAME: &str = "attachment-transfer";
const PROFILE_ENV: &str = "AT_PROFILE";

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Resolves the application base directory from the platform data directory.
#[derive(Debug, Default)]
pub struct DirsAppDirsAdapter {
    base_data_local_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `base` instead of the system local data directory.
    pub fn with_base_data_local_dir(base: PathBuf) -> Self {
        Self {
            base_data_local_dir_override: Some(base),
        }
    }

    fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_local_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    /// `app_data_root` is the local data directory joined with
    /// `attachment-transfer`, suffixed with `-<AT_PROFILE>` when set.
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base_data.join(resolved_app_dir_name()),
        })
    }
}
