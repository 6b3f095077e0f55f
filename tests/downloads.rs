// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::sync::Arc;
use std::time::Duration;

use skiff::{Asset, Browser, BrowserConfig, Downloader, HttpClient, Image, Script};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn asset_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(path("/big.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![0xAB_u8; 64 * 1024], "image/jpeg")
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;
    Mock::given(path("/small.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"JPEGDATA".to_vec(), "image/jpeg"))
        .mount(&server)
        .await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Hello"))
        .mount(&server)
        .await;
    server
}

fn image(server: &MockServer, name: &str) -> Image {
    Image::new(
        Url::parse(&format!("{}/{}", server.uri(), name)).unwrap(),
        "",
        "",
        "",
    )
}

fn downloader() -> Downloader {
    Downloader::new(Arc::new(HttpClient::new().unwrap()), "skiff-test/1.0")
}

#[tokio::test]
async fn test_download_size_matches_sink() {
    let server = asset_server().await;
    let mut out = Vec::new();

    let size = downloader()
        .download(&image(&server, "big.jpg"), &mut out)
        .await
        .unwrap();

    assert_eq!(size, 64 * 1024);
    assert_eq!(size, out.len() as u64);
}

#[tokio::test]
async fn test_download_transport_failure() {
    let script = Script::new(Url::parse("http://127.0.0.1:1/app.js").unwrap(), "", "");
    let mut out = Vec::new();

    let err = downloader().download(&script, &mut out).await.unwrap_err();
    assert!(err.is_transport());
}

/// Announces a large body, sends part of it, then hangs up
async fn dropping_server() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: image/jpeg\r\ncontent-length: 100000\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        socket.write_all(&[0xCD; 4096]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });
    Url::parse(&format!("http://{}/cut.jpg", addr)).unwrap()
}

#[tokio::test]
async fn test_dropped_connection_keeps_partial_write() {
    let url = dropping_server().await;
    let (tx, mut rx) = mpsc::channel(1);
    downloader().download_async(Image::new(url, "", "", ""), Vec::new(), tx);

    let result = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(result.error.unwrap().is_transport());
    assert!(result.size > 0);
    assert!(result.size < 100_000);
    assert_eq!(result.size, result.sink.len() as u64);
    assert!(result.sink.iter().all(|&b| b == 0xCD));
}

#[tokio::test]
async fn test_two_async_downloads_report_once_each() {
    let server = asset_server().await;
    let downloader = downloader();
    let (tx, mut rx) = mpsc::channel(1);

    let big = image(&server, "big.jpg");
    let small = image(&server, "small.jpg");
    downloader.download_async(big.clone(), Vec::new(), tx.clone());
    downloader.download_async(small.clone(), Vec::new(), tx.clone());

    let mut pending = 2;
    let mut seen = Vec::new();
    while pending > 0 {
        let result = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(result.error.is_none());
        assert_ne!(result.size, 0);
        assert_eq!(result.size, result.sink.len() as u64);
        if result.asset == big {
            assert_eq!(result.size, 64 * 1024);
        } else {
            assert_eq!(result.asset, small);
            assert_eq!(result.sink, b"JPEGDATA");
        }
        seen.push(result.asset.url().clone());
        pending -= 1;
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 2);
    assert!(tokio::time::timeout(Duration::from_millis(100), rx.recv())
        .await
        .is_err());
    drop(tx);
}

#[tokio::test]
async fn test_browser_download_writes_current_page() {
    let server = asset_server().await;
    let mut bow = Browser::new(BrowserConfig::default()).unwrap();
    bow.open(&server.uri()).await.unwrap();

    let mut out = Vec::new();
    let size = bow.download(&mut out).await.unwrap();
    assert_eq!(size, out.len() as u64);
    assert_eq!(out, b"Hello");
}

#[tokio::test]
async fn test_browser_downloader_uses_session_agent() {
    let server = MockServer::start().await;
    Mock::given(path("/logo.png"))
        .and(wiremock::matchers::header("user-agent", "Agent/7"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PNG".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let mut bow = Browser::new(BrowserConfig::default()).unwrap();
    bow.set_user_agent("Agent/7");

    let mut out = Vec::new();
    let logo = image(&server, "logo.png");
    let size = bow.downloader().download(&logo, &mut out).await.unwrap();
    assert_eq!(size, 3);
    assert_eq!(out, b"PNG");
}
