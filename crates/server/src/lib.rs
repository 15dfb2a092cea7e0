//! pHash Server - HTTP API for perceptual hashing of remote images
//!
//! This crate wraps the `phash-service` pipeline in an Axum server. It
//! accepts an image URL, downloads the image into a scratch file, computes
//! its 8×8 DCT perceptual hash and answers with the hex string.
//!
//! # Features
//!
//! - **Error Mapping**: download failures answer 400, processing failures 500,
//!   malformed bodies 422; every error body is `{"detail": "..."}`
//! - **Middleware**: Compression, CORS, request ID tracking, structured logging
//! - **Configuration**: Environment variable and file-based configuration
//! - **Metrics**: Prometheus exposition of request outcomes and latency
//! - **Graceful Shutdown**: Proper signal handling for production deployments
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Service acknowledgement
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Prometheus metrics (when enabled)
//! - `POST /process-image/` - Download an image and return its pHash

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
