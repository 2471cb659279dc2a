//! Directory index fallback

use std::path::{Path, PathBuf};
use tokio::fs;

/// Return `fs_path` if it is a file, or the first default index file inside it
/// if it is a directory. Anything else (missing, special file, no index) is `None`.
pub async fn apply(fs_path: &Path, defaults: &[String]) -> Option<PathBuf> {
    let meta = fs::metadata(fs_path).await.ok()?;

    if meta.is_file() {
        return Some(fs_path.to_path_buf());
    }
    if !meta.is_dir() {
        return None;
    }

    for name in defaults {
        let candidate = fs_path.join(name);
        if let Ok(m) = fs::metadata(&candidate).await {
            if m.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
