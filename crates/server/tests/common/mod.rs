//! Helpers for driving the router in-process against a local image host.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

/// 64×64 PNG with a deterministic pattern.
pub fn sample_png() -> Vec<u8> {
    let img = RgbImage::from_fn(64, 64, |x, y| {
        let v = if (x / 8 + y / 8) % 2 == 0 { 230 } else { 20 };
        Rgb([v, (x * 4) as u8, (y * 4) as u8])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode sample png");
    buf
}

/// Serves `/valid.png`, `/notes.txt` and `/empty.png`; 404 for the rest.
pub async fn spawn_image_host() -> SocketAddr {
    let png = sample_png();
    let app = Router::new()
        .route(
            "/valid.png",
            get(move || {
                let png = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], png) }
            }),
        )
        .route(
            "/notes.txt",
            get(|| async { ([(header::CONTENT_TYPE, "text/plain")], "not an image\n") }),
        )
        .route(
            "/empty.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], Vec::<u8>::new()) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind image host");
    let addr = listener.local_addr().expect("image host addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("image host");
    });
    addr
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

/// Router whose scratch files land in `scratch_dir`.
pub fn test_router(scratch_dir: &Path) -> Router {
    let config = ServerConfig {
        scratch_dir: Some(scratch_dir.to_path_buf()),
        ..Default::default()
    };
    build_router(Arc::new(
        ServerState::new(config).expect("Failed to create test state"),
    ))
}

pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read scratch dir").count()
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.expect("router response");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec();
    (status, body)
}

pub async fn post_json(router: Router, body: &str) -> (StatusCode, serde_json::Value) {
    post_with_content_type(router, Some("application/json"), body).await
}

/// POST `body` to `/process-image/`, omitting `Content-Type` when `None`.
pub async fn post_with_content_type(
    router: Router,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("POST").uri("/process-image/");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("build request");
    let (status, bytes) = send(router, request).await;
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

pub async fn get_path(router: Router, path: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("build request");
    send(router, request).await
}
