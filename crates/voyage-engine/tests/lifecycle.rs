use std::sync::Arc;

use voyage_core::{Collection, MediaFile, NewPackage, PackagePatch, PackageStatus, Video, videos};
use voyage_engine::{Catalog, Level, MediaUploader, MomentLibrary, RecordingNotifier};
use voyage_storage::{BlobBucket, FilePreferences, LocalStore};

async fn catalog(dir: &tempfile::TempDir) -> (Catalog, Arc<RecordingNotifier>) {
    let store = LocalStore::new(Some(dir.path().join("voyage.db")))
        .await
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    (Catalog::new(Arc::new(store), notifier.clone()), notifier)
}

#[tokio::test]
async fn test_package_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, notifier) = catalog(&dir).await;
    let repo = catalog.travel();

    // Empty collection
    assert!(repo.fetch_all().await.is_empty());
    assert!(!repo.is_loading().await);

    // Create, then read back the same record
    let mut new = NewPackage::new("Santorini Sunsets", "$1,450");
    new.location = Some("Greece".into());
    new.highlights = vec!["Oia".into(), "Caldera cruise".into()];
    let created = repo.create(new).await.unwrap();
    assert_eq!(created.slug, "santorini-sunsets");
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(repo.fetch_by_id(&created.id).await.unwrap(), created);

    // Publishing only changes status and updated_at
    let published = repo.publish(&created.id).await.unwrap();
    assert!(published.updated_at > created.updated_at);
    let mut expected = created.clone();
    expected.status = PackageStatus::Published;
    expected.updated_at = published.updated_at;
    assert_eq!(published, expected);
    assert_eq!(
        repo.fetch_by_slug("santorini-sunsets").await.unwrap().id,
        created.id
    );

    let drafted = repo.unpublish(&created.id).await.unwrap();
    assert_eq!(drafted.status, PackageStatus::Draft);
    assert!(repo.fetch_by_slug("santorini-sunsets").await.is_none());

    // Video list edits stay densely ordered
    let mut list = drafted.videos.clone();
    videos::push(&mut list, Video::link("https://youtu.be/abc", Some("Intro".into()), None));
    videos::push(&mut list, Video::link("https://vimeo.com/42", None, None));
    videos::push(&mut list, Video::uploaded("https://cdn.example.com/v.mp4"));
    videos::move_to(&mut list, 2, 0).unwrap();
    let updated = repo
        .update(&created.id, PackagePatch::videos(list))
        .await
        .unwrap();
    assert!(videos::is_dense(&updated.videos));
    assert_eq!(updated.videos[0].provider(), "Uploaded Video");
    assert_eq!(updated.videos[1].title.as_deref(), Some("Intro"));

    // Delete, then delete again
    let successes = notifier.count(Level::Success);
    assert!(repo.delete(&created.id).await);
    assert!(repo.packages().await.is_empty());
    assert!(!repo.delete(&created.id).await);
    assert!(repo.packages().await.is_empty());
    assert_eq!(notifier.count(Level::Success), successes + 1);
}

#[tokio::test]
async fn test_lookup_across_collections() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, _notifier) = catalog(&dir).await;

    let discovery = catalog
        .discovery()
        .create(NewPackage::new("Northern Lights", "$2,100"))
        .await
        .unwrap();
    let travel = catalog
        .travel()
        .create(NewPackage::new("Northern Lights", "$3,000"))
        .await
        .unwrap();

    // Slugs are unique per collection, not across them
    assert_eq!(discovery.slug, travel.slug);

    let (collection, found) = catalog.lookup(&discovery.id).await.unwrap();
    assert_eq!(collection, Collection::Discovery);
    assert_eq!(found.price, "$2,100");

    catalog.travel().publish(&travel.id).await.unwrap();
    let (collection, found) = catalog.lookup(&travel.slug).await.unwrap();
    assert_eq!(collection, Collection::Travel);
    assert_eq!(found.id, travel.id);
}

#[tokio::test]
async fn test_travel_moments_with_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let bucket = BlobBucket::new(dir.path().join("media"), None).unwrap();
    let uploader = MediaUploader::new(Arc::new(bucket), notifier.clone());

    let prefs_path = dir.path().join("preferences.json");
    let library = MomentLibrary::new(Arc::new(FilePreferences::open(prefs_path.clone()).unwrap()));

    let file = MediaFile::new("harbour-walk.mp4", vec![0; 2048]);
    let size = file.size();
    let url = uploader
        .upload(file, Some("travel-moments"))
        .await
        .unwrap();
    library
        .add(voyage_core::TravelMomentVideo::new("harbour-walk.mp4", url.clone(), size))
        .unwrap();

    let reopened = MomentLibrary::new(Arc::new(FilePreferences::open(prefs_path).unwrap()));
    let stored = reopened.videos();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "harbour-walk");
    assert_eq!(stored[0].url, url);
    assert_eq!(stored[0].file_size, 2048);

    assert!(reopened.delete(&stored[0].id).unwrap());
    assert!(uploader.delete(&url).await);
    assert_eq!(notifier.count(Level::Error), 0);
}
