pub mod admin;
pub mod completions;
pub mod media;
pub mod moment;
pub mod package;

use std::path::PathBuf;

use anyhow::{Context, Result};
use voyage_core::MediaFile;

/// Read files picked on the command line
pub async fn read_files(paths: &[PathBuf]) -> Result<Vec<MediaFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = MediaFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}
