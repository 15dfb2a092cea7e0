//! Local HTTP image host shared by the integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::routing::get;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

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

/// Serves:
/// - `/valid.png`: [`sample_png`]
/// - `/notes.txt`: plain text
/// - `/empty.png`: zero-length body
/// - `/broken.png`: server error
/// - anything else: 404
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
        )
        .route(
            "/broken.png",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
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

/// Number of entries left in `dir`.
pub fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).expect("read scratch dir").count()
}

/// What a [`spawn_raw_host`] connection does after sending part of the body.
#[derive(Debug, Clone, Copy)]
pub enum BodyEnd {
    /// Close the connection well short of the advertised length.
    Truncate,
    /// Keep the connection open without sending anything more.
    Stall,
}

/// Advertised body length for [`spawn_raw_host`] responses.
pub const ADVERTISED_LEN: usize = 100_000;

/// Plain TCP host answering every request with a 200 that advertises
/// [`ADVERTISED_LEN`] bytes but only sends the first few kilobytes.
pub async fn spawn_raw_host(end: BodyEnd) -> SocketAddr {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind raw host");
    let addr = listener.local_addr().expect("raw host addr");
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {ADVERTISED_LEN}\r\n\r\n"
                );
                let mut partial = sample_png();
                partial.resize(4096, 0);
                if socket.write_all(head.as_bytes()).await.is_err()
                    || socket.write_all(&partial).await.is_err()
                    || socket.flush().await.is_err()
                {
                    return;
                }
                match end {
                    BodyEnd::Truncate => drop(socket),
                    BodyEnd::Stall => {
                        std::future::pending::<()>().await;
                        drop(socket);
                    }
                }
            });
        }
    });
    addr
}
