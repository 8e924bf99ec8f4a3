//! Writes named text files into a directory

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create `dir` if needed and write each `(file name, content)` pair into it.
///
/// Files are written in order. A failure after at least one file was written
/// is reported as [`Error::PartialWrite`] and the written files stay on disk.
pub async fn write_files(dir: &Path, files: &[(&str, &str)]) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        if let Err(source) = tokio::fs::write(&path, content).await {
            if written.is_empty() {
                return Err(Error::Io(source));
            }
            return Err(Error::PartialWrite {
                written,
                failed: path,
                source,
            });
        }
        debug!(path = %path.display(), bytes = content.len(), "Artifact written");
        written.push(path);
    }
    Ok(written)
}
