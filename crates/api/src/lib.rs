//! Mileage Prediction API Server
//!
//! HTTP request surface for the city, average and highway mileage models.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::{CategoryError, CategoryUniverse, Validator};
use inference_engine::{Metric, MileagePredictor, PredictError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
mod routes;

pub use crate::config::AppConfig;
pub use error::{ApiError, ErrorBody, FieldError};

use crate::config::LoggingConfig;
use rate_limit::DefaultGovernorConfig;

/// Errors that prevent the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Invalid log level {0:?}")]
    InvalidLogLevel(String),
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("Category universe unavailable: {0}")]
    Categories(#[from] CategoryError),
    #[error("Category enforcement enabled but no category values are configured")]
    CategoriesNotConfigured,
    #[error(transparent)]
    Models(#[from] PredictError),
    #[error("Invalid rate limit: per_second and burst_size must be non-zero")]
    RateLimit,
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared read-only across handlers
pub struct AppState {
    /// Loaded models, schemas and validator
    pub predictor: MileagePredictor,
    /// Dropdown choices
    pub universe: CategoryUniverse,
    /// Prometheus exposition handle, if a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(predictor: MileagePredictor, universe: CategoryUniverse) -> Self {
        Self {
            predictor,
            universe,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Load the category universe and all three models.
    ///
    /// Fails if any model or schema is missing or malformed, or if category
    /// enforcement is enabled without any category values to enforce.
    pub fn load(config: &AppConfig) -> Result<Self, StartupError> {
        let universe = match &config.categories.path {
            Some(path) => CategoryUniverse::load(path)?,
            None => CategoryUniverse::new(),
        };

        let mut validator = Validator::new(config.validation.clone());
        if config.categories.enforce {
            if universe.is_empty() {
                return Err(StartupError::CategoriesNotConfigured);
            }
            validator = validator.with_universe(universe.clone());
        }

        let predictor = MileagePredictor::load(&config.models, validator)?;
        Ok(Self::new(predictor, universe))
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub models: Vec<ModelHealth>,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelHealth {
    pub metric: Metric,
    pub kind: &'static str,
    pub features: usize,
}

/// Create the application router without rate limiting
pub fn create_router(state: Arc<AppState>) -> Router {
    build_router(state, None)
}

/// Create the application router with the prediction endpoint rate limited
pub fn create_rate_limited_router(
    state: Arc<AppState>,
    governor: Arc<DefaultGovernorConfig>,
) -> Router {
    build_router(state, Some(governor))
}

fn build_router(state: Arc<AppState>, governor: Option<Arc<DefaultGovernorConfig>>) -> Router {
    let mut predict = Router::new().route("/api/v1/predict", post(routes::predictions::predict));
    if let Some(config) = governor {
        predict = predict.layer(GovernorLayer { config });
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/categories", get(routes::categories::get_categories))
        .route("/metrics", get(metrics_handler))
        .merge(predict)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let models = Metric::ALL
        .into_iter()
        .map(|metric| {
            let model = state.predictor.model(metric);
            ModelHealth {
                metric,
                kind: model.model_kind(),
                features: model.schema().len(),
            }
        })
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        models,
    })
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), StartupError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| StartupError::InvalidLogLevel(config.level.clone()))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, StartupError> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Run the server
pub async fn run_server(config: &AppConfig, state: Arc<AppState>) -> Result<(), StartupError> {
    let app = if config.rate_limit.enabled {
        let governor =
            rate_limit::create_governor_config(&config.rate_limit).ok_or(StartupError::RateLimit)?;
        info!(
            "Rate limiting predictions: burst {}, one request per {}s",
            config.rate_limit.burst_size, config.rate_limit.per_second
        );
        create_rate_limited_router(state, governor)
    } else {
        create_router(state)
    };

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
