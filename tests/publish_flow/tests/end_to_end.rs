//! Full publish flows against the reference backends.

use publish_flow::{PUBLISHED_KEYS, write_site};
use siteship_backends::{DirBackend, MemoryBackend, publisher_for};
use siteship_manifest::build_manifest;
use siteship_publish::Publisher;
use siteship_settings::{Platform, Settings};
use tempfile::TempDir;

#[tokio::test]
async fn dir_backend_publishes_the_whole_site() {
    let build = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_site(build.path());

    let publisher = Publisher::with_backend(build.path(), Box::new(DirBackend::new(target.path())));
    let result = publisher.publish().await;
    assert!(result.success, "{}", result.message);

    // Published tree matches the build, dotfile junk excluded.
    assert_eq!(
        std::fs::read(target.path().join("index.html")).unwrap(),
        b"<html>home</html>"
    );
    assert!(target.path().join(".htaccess").exists());
    assert!(target.path().join("_redirects").exists());
    assert!(target.path().join("post/hello/index.html").exists());
    assert!(!target.path().join(".DS_Store").exists());
    assert!(!target.path().join(".git").exists());

    // Target and build produce identical manifests.
    assert_eq!(
        build_manifest(target.path()).unwrap(),
        build_manifest(build.path()).unwrap()
    );
}

#[tokio::test]
async fn dir_backend_republish_is_incremental() {
    let build = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_site(build.path());

    let first = Publisher::with_backend(build.path(), Box::new(DirBackend::new(target.path())));
    let result = first.publish().await;
    assert!(result.success);
    assert!(result.message.contains("6 uploaded"), "{}", result.message);

    let second = Publisher::with_backend(build.path(), Box::new(DirBackend::new(target.path())));
    let result = second.publish().await;
    assert!(result.success);
    assert!(result.message.contains("0 uploaded"), "{}", result.message);
    assert!(result.message.contains("6 unchanged"), "{}", result.message);
}

#[tokio::test]
async fn memory_backend_uploads_only_changed_files() {
    let build = TempDir::new().unwrap();
    write_site(build.path());

    let store = MemoryBackend::new();
    let first = Publisher::with_backend(build.path(), Box::new(store.clone()));
    assert!(first.publish().await.success);
    assert_eq!(store.len(), PUBLISHED_KEYS.len());
    let after_first = store.upload_count();

    // Touch one file; only it should transfer on the next run.
    std::fs::write(build.path().join("about.html"), b"<html>about v2</html>").unwrap();
    let second = Publisher::with_backend(build.path(), Box::new(store.clone()));
    assert!(second.publish().await.success);
    assert_eq!(store.upload_count(), after_first + 1);
    assert_eq!(store.get("/about.html").unwrap(), b"<html>about v2</html>");
}

#[tokio::test]
async fn memory_backend_stores_every_published_key() {
    let build = TempDir::new().unwrap();
    write_site(build.path());

    let store = MemoryBackend::new();
    let publisher = Publisher::with_backend(build.path(), Box::new(store.clone()));
    assert!(publisher.publish().await.success);

    for key in PUBLISHED_KEYS {
        assert!(store.get(key).is_some(), "{key} missing");
    }
    assert!(store.get("/.DS_Store").is_none());
}

#[tokio::test]
async fn probe_is_independent_of_publishing() {
    let target = TempDir::new().unwrap();
    let publisher = Publisher::with_backend(
        "/nonexistent/build",
        Box::new(DirBackend::new(target.path())),
    );

    // Probing works even though this build dir could never publish.
    let report = publisher.probe().await.unwrap();
    assert!(report.reachable);
}

#[tokio::test]
async fn settings_select_the_backend() {
    let build = TempDir::new().unwrap();
    write_site(build.path());

    let mut settings = Settings::default();
    settings.platform = Platform::Sftp;
    let publisher = publisher_for(settings, build.path());

    let result = publisher.publish().await;
    assert!(!result.success);
    assert!(result.message.contains("sftp"), "{}", result.message);
}

#[tokio::test]
async fn cancellation_reports_remaining_paths() {
    let build = TempDir::new().unwrap();
    write_site(build.path());

    let store = MemoryBackend::new();
    let publisher = Publisher::with_backend(build.path(), Box::new(store.clone()));
    publisher.cancel_token().cancel();

    let result = publisher.publish().await;
    assert!(!result.success);
    assert!(result.message.contains("cancelled"));
    assert!(store.is_empty());
}
