use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::warn;

use super::read_files;
use crate::app::App;
use crate::cli::MediaCommands;

pub async fn handle(cmd: MediaCommands, app: &App) -> Result<()> {
    match cmd {
        MediaCommands::Upload {
            files,
            prefix,
            copy,
        } => upload(app, files, prefix, copy).await,
        MediaCommands::Delete { url } => {
            if !app.uploader.delete(&url).await {
                bail!("Could not delete {url}");
            }
            Ok(())
        }
    }
}

async fn upload(app: &App, paths: Vec<PathBuf>, prefix: Option<String>, copy: bool) -> Result<()> {
    let files = read_files(&paths).await?;
    let requested = files.len();
    let urls = app.uploader.upload_many(files, prefix.as_deref()).await;

    for url in &urls {
        println!("{url}");
    }

    if copy && !urls.is_empty() {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(urls.join("\n"))) {
            Ok(()) => println!("✓ Copied {} URL(s) to clipboard", urls.len()),
            Err(e) => warn!("Clipboard unavailable: {e}"),
        }
    }

    if urls.len() < requested {
        bail!("{} of {} uploads failed", requested - urls.len(), requested);
    }
    Ok(())
}
