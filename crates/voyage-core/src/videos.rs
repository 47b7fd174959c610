//! Ordered video list operations
//!
//! Every mutation renumbers the list so that `videos[i].order == i`.

use crate::{Error, Result, Video};

/// Reassign `order` densely from 0
pub fn renumber(videos: &mut [Video]) {
    for (i, video) in videos.iter_mut().enumerate() {
        video.order = i as u32;
    }
}

/// Append a video at the end
pub fn push(videos: &mut Vec<Video>, video: Video) {
    videos.push(video);
    renumber(videos);
}

/// Remove the video at `index`
pub fn remove(videos: &mut Vec<Video>, index: usize) -> Result<Video> {
    check_index(videos, index)?;
    let removed = videos.remove(index);
    renumber(videos);
    Ok(removed)
}

/// Move the video at `from` so it ends up at position `to` (drag and drop)
pub fn move_to(videos: &mut Vec<Video>, from: usize, to: usize) -> Result<()> {
    check_index(videos, from)?;
    check_index(videos, to)?;
    if from != to {
        let video = videos.remove(from);
        videos.insert(to, video);
    }
    renumber(videos);
    Ok(())
}

/// Set or clear title/description of the video at `index`. Empty strings clear.
pub fn update_info(
    videos: &mut [Video],
    index: usize,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    check_index(videos, index)?;
    let video = &mut videos[index];
    if let Some(title) = title {
        video.title = non_empty(title);
    }
    if let Some(description) = description {
        video.description = non_empty(description);
    }
    Ok(())
}

/// True when `order` values are exactly 0..N-1 in sequence
pub fn is_dense(videos: &[Video]) -> bool {
    videos
        .iter()
        .enumerate()
        .all(|(i, video)| video.order as usize == i)
}

fn check_index(videos: &[Video], index: usize) -> Result<()> {
    if index < videos.len() {
        Ok(())
    } else {
        Err(Error::VideoIndex {
            index,
            len: videos.len(),
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
