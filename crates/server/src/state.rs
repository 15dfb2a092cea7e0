use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use phash_service::Pipeline;
use std::sync::Arc;

/// The Prometheus recorder is process-global; install it once and hand out
/// the same handle to every state built afterwards.
static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Download-and-hash pipeline (shared across requests)
    pub pipeline: Pipeline,

    /// Prometheus render handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let pipeline = Pipeline::new(config.pipeline_config())
            .map_err(|err| ServerError::Config(format!("pipeline: {err}")))?;

        let metrics = if config.metrics_enabled {
            Some(prometheus_handle()?)
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            metrics,
        })
    }
}

fn prometheus_handle() -> ServerResult<PrometheusHandle> {
    PROMETHEUS
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .cloned()
        .map_err(|err| ServerError::Config(format!("metrics recorder: {err}")))
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
}
