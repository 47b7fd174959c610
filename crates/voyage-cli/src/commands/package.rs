use anyhow::{Result, anyhow, bail};
use voyage_core::listing::{self, PackageFilter, StatusTab};
use voyage_core::media::remaining_slots;
use voyage_core::{Collection, NewPackage, Package, PackagePatch, Video, slug, videos};
use voyage_engine::PackageRepository;

use super::read_files;
use crate::app::App;
use crate::cli::{PackageCommands, PackageFields};

pub async fn handle(cmd: PackageCommands, app: &App) -> Result<()> {
    match cmd {
        PackageCommands::List {
            collection,
            search,
            status,
            limit,
            json,
        } => list(app, collection, search, status, limit, json).await,
        PackageCommands::Featured { collection, limit } => {
            let packages = app.catalog.repository(collection).fetch_all().await;
            for package in listing::published(&packages, Some(limit)) {
                println!(
                    "  {} ({}) - {}  ★ {} ({} reviews)",
                    package.title,
                    package.slug,
                    package.price,
                    package.display_rating(),
                    package.display_review_count()
                );
            }
            Ok(())
        }
        PackageCommands::Show { ident, json } => show(app, ident, json).await,
        PackageCommands::Create {
            collection,
            title,
            price,
            fields,
            publish,
        } => create(app, collection, title, price, fields, publish).await,
        PackageCommands::Update {
            collection,
            id,
            title,
            price,
            fields,
        } => update(app, collection, id, title, price, fields).await,
        PackageCommands::Publish { collection, id } => {
            let repo = app.catalog.repository(collection);
            repo.publish(&id)
                .await
                .map(|_| ())
                .ok_or_else(|| anyhow!("Could not publish {id}"))
        }
        PackageCommands::Unpublish { collection, id } => {
            let repo = app.catalog.repository(collection);
            repo.unpublish(&id)
                .await
                .map(|_| ())
                .ok_or_else(|| anyhow!("Could not unpublish {id}"))
        }
        PackageCommands::Delete {
            collection,
            id,
            force,
        } => delete(app, collection, id, force).await,
        PackageCommands::AddImage {
            collection,
            id,
            files,
        } => add_images(app, collection, id, files).await,
        PackageCommands::AddVideo {
            collection,
            id,
            file,
            url,
            title,
            description,
        } => add_video(app, collection, id, file, url, title, description).await,
        PackageCommands::RemoveVideo {
            collection,
            id,
            index,
        } => {
            let repo = app.catalog.repository(collection);
            let mut list = require(repo, &id).await?.videos;
            let removed = videos::remove(&mut list, index)?;
            save_videos(repo, &id, list).await?;
            println!("  Removed: {}", removed.url);
            Ok(())
        }
        PackageCommands::MoveVideo {
            collection,
            id,
            from,
            to,
        } => {
            let repo = app.catalog.repository(collection);
            let mut list = require(repo, &id).await?.videos;
            videos::move_to(&mut list, from, to)?;
            save_videos(repo, &id, list).await
        }
        PackageCommands::EditVideo {
            collection,
            id,
            index,
            title,
            description,
        } => {
            let repo = app.catalog.repository(collection);
            let mut list = require(repo, &id).await?.videos;
            videos::update_info(&mut list, index, title, description)?;
            save_videos(repo, &id, list).await
        }
        PackageCommands::Slug { title } => {
            let slug = slug::slugify(&title);
            if slug.is_empty() {
                println!("'{}' has no slug characters; the store will fall back to a default", title);
            } else {
                println!("{slug}");
            }
            Ok(())
        }
    }
}

async fn list(
    app: &App,
    collection: Collection,
    search: Option<String>,
    status: StatusTab,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let packages = app.catalog.repository(collection).fetch_all().await;

    let filter = PackageFilter {
        search: search.unwrap_or_default(),
        tab: status,
    };
    let shown: Vec<&Package> = filter
        .apply(&packages)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No packages found.");
        return Ok(());
    }

    println!("Packages in {} ({}):", collection, shown.len());
    for package in shown {
        println!("  [{}] {} ({})", package.status, package.title, package.slug);
        println!("    ID: {}  Price: {}", package.id, package.price);
    }

    Ok(())
}

async fn show(app: &App, ident: String, json: bool) -> Result<()> {
    let (collection, package) = app
        .catalog
        .lookup(&ident)
        .await
        .ok_or_else(|| anyhow!("Package not found: {ident}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&package)?);
        return Ok(());
    }

    println!("Package: {}", package.title);
    println!("  Collection: {}", collection);
    println!("  ID: {}", package.id);
    println!("  Slug: {}", package.slug);
    println!("  Status: {}", package.status);
    println!("  Price: {}", package.price);
    for (label, value) in [
        ("Duration", &package.duration),
        ("Travel period", &package.travel_period),
        ("Location", &package.location),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    println!(
        "  Rating: {} ({} reviews)",
        package.display_rating(),
        package.display_review_count()
    );
    println!("  Created: {}", package.created_at);
    println!("  Updated: {}", package.updated_at);

    if let Some(description) = &package.description {
        println!("\n{description}");
    }

    print_list("Highlights", &package.highlights);
    print_list("Inclusions", &package.inclusions);
    print_list("Exclusions", &package.exclusions);
    print_list("Images", &package.images);

    if !package.videos.is_empty() {
        println!("\nVideos ({}):", package.videos.len());
        for video in &package.videos {
            let title = video.title.as_deref().unwrap_or("Untitled");
            println!("  [{}] {} - {} ({})", video.order, title, video.url, video.provider());
        }
    }

    if !package.itinerary.is_empty() {
        println!("\nItinerary:");
        for day in &package.itinerary {
            println!("  {}: {}", day.day, day.activity);
            if !day.accommodation.is_empty() {
                println!("    Stay: {}", day.accommodation);
            }
        }
    }

    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{} ({}):", label, items.len());
    for item in items {
        println!("  - {item}");
    }
}

async fn create(
    app: &App,
    collection: Collection,
    title: String,
    price: String,
    fields: PackageFields,
    publish: bool,
) -> Result<()> {
    let repo = app.catalog.repository(collection);
    let new = NewPackage {
        title,
        price,
        duration: fields.duration,
        travel_period: fields.travel_period,
        location: fields.location,
        description: fields.description,
        rating: fields.rating,
        review_count: fields.review_count,
        highlights: fields.highlights,
        inclusions: fields.inclusions,
        exclusions: fields.exclusions,
        ..Default::default()
    };

    let package = repo
        .create(new)
        .await
        .ok_or_else(|| anyhow!("Package was not created"))?;
    println!("  ID: {}", package.id);
    println!("  Slug: {}", package.slug);

    if publish && repo.publish(&package.id).await.is_none() {
        bail!("Created {} but could not publish it", package.id);
    }

    Ok(())
}

async fn update(
    app: &App,
    collection: Collection,
    id: String,
    title: Option<String>,
    price: Option<String>,
    fields: PackageFields,
) -> Result<()> {
    let patch = PackagePatch {
        title,
        price,
        duration: fields.duration,
        travel_period: fields.travel_period,
        location: fields.location,
        description: fields.description,
        rating: fields.rating,
        review_count: fields.review_count,
        highlights: non_empty(fields.highlights),
        inclusions: non_empty(fields.inclusions),
        exclusions: non_empty(fields.exclusions),
        ..Default::default()
    };
    if patch.is_empty() {
        bail!("Nothing to update");
    }

    app.catalog
        .repository(collection)
        .update(&id, patch)
        .await
        .map(|_| ())
        .ok_or_else(|| anyhow!("Could not update {id}"))
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

async fn delete(app: &App, collection: Collection, id: String, force: bool) -> Result<()> {
    let repo = app.catalog.repository(collection);
    let package = require(repo, &id).await?;

    if !force {
        print!("Delete '{}'? [y/N] ", package.title);
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !repo.delete(&package.id).await {
        bail!("Could not delete {id}");
    }
    Ok(())
}

async fn add_images(
    app: &App,
    collection: Collection,
    id: String,
    paths: Vec<std::path::PathBuf>,
) -> Result<()> {
    let repo = app.catalog.repository(collection);
    let package = require(repo, &id).await?;

    let remaining = remaining_slots(package.images.len(), app.limits.max_images);
    if paths.len() > remaining {
        bail!(
            "A package can have at most {} images ({} slots left)",
            app.limits.max_images,
            remaining
        );
    }

    let files = read_files(&paths).await?;
    for file in &files {
        app.limits.check_image(file)?;
    }

    let urls = app.uploader.upload_many(files, Some("packages")).await;
    if urls.is_empty() {
        bail!("No images were uploaded");
    }

    let mut images = package.images;
    images.extend(urls);
    repo.update(&id, PackagePatch::images(images))
        .await
        .map(|_| ())
        .ok_or_else(|| anyhow!("Could not update {id}"))
}

async fn add_video(
    app: &App,
    collection: Collection,
    id: String,
    file: Option<std::path::PathBuf>,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let repo = app.catalog.repository(collection);
    let package = require(repo, &id).await?;

    if remaining_slots(package.videos.len(), app.limits.max_package_videos) == 0 {
        bail!(
            "A package can have at most {} videos",
            app.limits.max_package_videos
        );
    }

    let video = match (file, url) {
        (Some(path), _) => {
            let file = read_files(&[path]).await?.remove(0);
            app.limits.check_video(&file)?;
            let url = app
                .uploader
                .upload(file, Some("videos"))
                .await
                .ok_or_else(|| anyhow!("Video was not uploaded"))?;
            let mut video = Video::uploaded(url);
            video.title = title;
            video.description = description;
            video
        }
        (None, Some(url)) => Video::link(url, title, description),
        (None, None) => bail!("Pass --file or --url"),
    };

    let mut list = package.videos;
    videos::push(&mut list, video);
    save_videos(repo, &id, list).await
}

async fn require(repo: &PackageRepository, id: &str) -> Result<Package> {
    repo.fetch_by_id(id)
        .await
        .ok_or_else(|| anyhow!("{} not found: {id}", repo.collection().noun()))
}

async fn save_videos(repo: &PackageRepository, id: &str, list: Vec<Video>) -> Result<()> {
    repo.update(id, PackagePatch::videos(list))
        .await
        .map(|_| ())
        .ok_or_else(|| anyhow!("Could not update videos of {id}"))
}
