// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::sync::Arc;

use skiff::{BookmarksJar, Browser, BrowserConfig, FileBookmarks, MemoryBookmarks};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "<html><head><title>Skiff Page 1</title></head><body><p>Hello, Skiff!</p></body></html>";

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html"))
        .mount(&server)
        .await;
    server
}

async fn assert_browser_bookmarks(jar: Arc<dyn BookmarksJar>) {
    let server = server().await;
    let mut bow = Browser::new(BrowserConfig::default()).unwrap();
    bow.set_bookmarks_jar(jar.clone());

    jar.save("test1", &server.uri()).unwrap();
    bow.open_bookmark("test1").await.unwrap();
    assert_eq!(bow.title().unwrap(), "Skiff Page 1");
    assert!(bow.body().unwrap().contains("<p>Hello, Skiff!</p>"));

    bow.bookmark("test2").unwrap();
    assert!(bow.bookmark("test2").unwrap_err().is_duplicate_name());
    bow.open_bookmark("test2").await.unwrap();
    assert_eq!(bow.title().unwrap(), "Skiff Page 1");
    assert_eq!(bow.history_len(), 2);

    assert_eq!(jar.read("test2").unwrap(), jar.read("test2").unwrap());
    assert!(jar.remove("test2"));
    assert!(!jar.has("test2"));
    assert!(bow.open_bookmark("test2").await.unwrap_err().is_not_found());
    assert_eq!(bow.history_len(), 2);
}

#[tokio::test]
async fn test_memory_bookmarks_with_browser() {
    assert_browser_bookmarks(Arc::new(MemoryBookmarks::new())).await;
}

#[tokio::test]
async fn test_file_bookmarks_with_browser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookmarks.json");

    assert_browser_bookmarks(Arc::new(FileBookmarks::open(&path).unwrap())).await;

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk.get("test1").is_some());
    assert!(on_disk.get("test2").is_none());
}

#[tokio::test]
async fn test_bookmark_requires_jar() {
    let server = server().await;
    let mut bow = Browser::new(BrowserConfig::default()).unwrap();
    bow.open(&server.uri()).await.unwrap();

    assert!(bow.bookmark("home").unwrap_err().is_illegal_state());
    assert!(bow.open_bookmark("home").await.unwrap_err().is_illegal_state());
}
