// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one HTML response, returning the base URL and a count of requests.
async fn serve_html(status: &str, body: &'static str) -> (String, JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await.unwrap();
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        1
    });
    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn probe_reads_the_loaded_body() {
    let (base, server) =
        serve_html("200 OK", "<html><body><h1>Nightly #42</h1><p>Started</p></body></html>").await;
    let surface = HttpPageSurface::new("dana", "tok").unwrap();

    surface.load(&format!("{}/job/Nightly/42/", base)).await.unwrap();
    let first = surface.probe().await.unwrap();
    let second = surface.probe().await.unwrap();

    assert!(first.has_text);
    assert_eq!(first.error_text.as_deref(), Some("Nightly #42"));
    assert_eq!(first, second);
    assert_eq!(server.await.unwrap(), 1);
}

#[tokio::test]
async fn error_status_still_renders_a_page() {
    let (base, _server) = serve_html("404 Not Found", "<body>Error: job not found</body>").await;
    let surface = HttpPageSurface::new("dana", "tok").unwrap();

    surface.load(&base).await.unwrap();

    assert_eq!(surface.status(), Some(404));
    let result = surface.probe().await.unwrap();
    assert_eq!(result.error_text.as_deref(), Some("Error: job not found"));
}

#[tokio::test]
async fn unreachable_page_is_a_load_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let surface = HttpPageSurface::new("dana", "tok").unwrap();

    let err = surface.load(&format!("http://{}/", addr)).await.unwrap_err();

    assert!(matches!(err, DisplayError::LoadFailed { .. }));
}

#[tokio::test]
async fn probe_before_load_fails() {
    let surface = HttpPageSurface::new("dana", "tok").unwrap();
    assert!(matches!(surface.probe().await, Err(DisplayError::ProbeFailed(_))));
}

#[tokio::test]
async fn closed_surface_ignores_labels_and_refuses_loads() {
    let surface = HttpPageSurface::new("dana", "tok").unwrap();
    surface.set_label("Jenkins Job - first").await;
    surface.close().await;
    surface.close().await;
    surface.set_label("Jenkins Job - second").await;

    assert!(!surface.is_open());
    assert_eq!(surface.label(), "Jenkins Job - first");
    assert!(matches!(surface.load("http://127.0.0.1:1/").await, Err(DisplayError::Closed)));
    assert!(matches!(surface.probe().await, Err(DisplayError::Closed)));
}
