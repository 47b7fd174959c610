use std::path::PathBuf;

use anyhow::{Result, bail};
use voyage_core::listing::format_file_size;
use voyage_core::media::remaining_slots;
use voyage_core::{MomentPatch, TravelMomentVideo};

use super::read_files;
use crate::app::App;
use crate::cli::MomentCommands;

pub async fn handle(cmd: MomentCommands, app: &App) -> Result<()> {
    match cmd {
        MomentCommands::List => list(app),
        MomentCommands::Add { files } => add(app, files).await,
        MomentCommands::Rename { id, name } => {
            let patch = MomentPatch {
                name: Some(name),
                url: None,
            };
            if !app.moments.update(&id, patch)? {
                bail!("Travel moment not found: {id}");
            }
            println!("✓ Renamed travel moment {id}");
            Ok(())
        }
        MomentCommands::Delete { id, purge } => delete(app, id, purge).await,
    }
}

fn list(app: &App) -> Result<()> {
    let videos = app.moments.videos();
    if videos.is_empty() {
        println!("No travel moments.");
        return Ok(());
    }

    println!(
        "Travel moments ({}/{}):",
        videos.len(),
        app.limits.max_moment_videos
    );
    for video in videos {
        println!("  {} ({})", video.name, video.id);
        println!("    {}  {}", format_file_size(video.file_size), video.url);
    }
    Ok(())
}

async fn add(app: &App, paths: Vec<PathBuf>) -> Result<()> {
    let remaining = remaining_slots(app.moments.len(), app.limits.max_moment_videos);
    if paths.len() > remaining {
        bail!(
            "At most {} travel moments are allowed ({} slots left)",
            app.limits.max_moment_videos,
            remaining
        );
    }

    let files = read_files(&paths).await?;
    for file in &files {
        app.limits.check_video(file)?;
    }

    for file in files {
        let name = file.name.clone();
        let size = file.size();
        let Some(url) = app.uploader.upload(file, Some("travel-moments")).await else {
            continue;
        };
        let video = TravelMomentVideo::new(&name, url, size);
        app.moments.add(video.clone())?;
        println!("  {} ({})", video.name, video.id);
    }
    Ok(())
}

async fn delete(app: &App, id: String, purge: bool) -> Result<()> {
    let Some(video) = app.moments.videos().into_iter().find(|v| v.id == id) else {
        bail!("Travel moment not found: {id}");
    };

    app.moments.delete(&id)?;
    println!("✓ Removed travel moment {}", video.name);

    if purge && !app.uploader.delete(&video.url).await {
        bail!("Could not delete {}", video.url);
    }
    Ok(())
}
