//! CLI command implementations

pub mod batch;
pub mod convert;
pub mod inspect;

pub use batch::BatchArgs;
pub use convert::ConvertArgs;
pub use inspect::InspectArgs;

use std::path::{Path, PathBuf};

/// Resolve a possibly relative directory against the current directory
pub(crate) fn resolve_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
