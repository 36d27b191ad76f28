pub mod app_dirs;
mod preview_store;

pub use app_dirs::DirsAppDirsAdapter;
pub use preview_store::FsPreviewStore;
