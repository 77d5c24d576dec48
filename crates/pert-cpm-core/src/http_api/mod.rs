use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    ActivityInput, ActivityNetwork, ActivityReport, PertEstimator, PertSummary, PertTaskInput,
    ScheduleError,
};

pub const ADDR_ENV: &str = "PERT_CPM_HTTP_ADDR";
pub const MAX_ACTIVITIES_ENV: &str = "PERT_CPM_MAX_ACTIVITIES";
pub const COMPUTE_TIMEOUT_ENV: &str = "PERT_CPM_COMPUTE_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub addr: SocketAddr,
    /// Upper bound on activities or tasks accepted in one request.
    pub max_activities: usize,
    pub compute_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_activities: 10_000,
            compute_timeout: Duration::from_millis(5_000),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid value '{value}' for {variable}")]
pub struct ConfigError {
    variable: &'static str,
    value: String,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ADDR_ENV) {
            config.addr = parse_var(ADDR_ENV, value)?;
        }
        if let Some(value) = lookup(MAX_ACTIVITIES_ENV) {
            config.max_activities = parse_var(MAX_ACTIVITIES_ENV, value)?;
        }
        if let Some(value) = lookup(COMPUTE_TIMEOUT_ENV) {
            let millis: u64 = parse_var(COMPUTE_TIMEOUT_ENV, value)?;
            config.compute_timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    variable: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError { variable, value })
}

/// Shared, read-only server state. Every request computes on its own network.
#[derive(Clone)]
pub struct AppState {
    config: Arc<HttpConfig>,
}

impl AppState {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Schedule(ScheduleError),
    Malformed(String),
    TooLarge(String),
    Timeout(String),
    Internal(String),
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Schedule(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Malformed(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Schedule(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: err.kind(),
                    subject: Some(err.subject().to_string()),
                    message: err.to_string(),
                },
            ),
            ApiError::Malformed(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "invalid_request",
                    subject: None,
                    message,
                },
            ),
            ApiError::TooLarge(message) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    error: "too_large",
                    subject: None,
                    message,
                },
            ),
            ApiError::Timeout(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: "timeout",
                    subject: None,
                    message,
                },
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal_error",
                    subject: None,
                    message,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpmRequest {
    pub activities: Vec<ActivityInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpmResponse {
    pub critical_path: Vec<String>,
    pub total_duration: f64,
    pub critical_count: usize,
    pub activities: Vec<ActivityReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PertRequest {
    pub tasks: Vec<PertTaskInput>,
    /// Defaults to the project expected time.
    #[serde(default)]
    pub target_time: Option<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cpm", post(compute_cpm))
        .route("/pert", post(compute_pert))
        .with_state(state)
}

pub async fn serve(config: HttpConfig) -> std::io::Result<()> {
    let addr = config.addr;
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "pert-cpm HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Runs a synchronous computation off the async workers, bounded by the configured timeout.
async fn run_bounded<T, F>(config: &HttpConfig, job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ScheduleError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(job);
    match tokio::time::timeout(config.compute_timeout, handle).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(join_err)) => Err(ApiError::Internal(join_err.to_string())),
        Err(_) => {
            warn!(timeout_ms = config.compute_timeout.as_millis() as u64, "compute timed out");
            Err(ApiError::Timeout(format!(
                "computation exceeded {} ms",
                config.compute_timeout.as_millis()
            )))
        }
    }
}

fn check_size(config: &HttpConfig, count: usize, what: &str) -> Result<(), ApiError> {
    if count > config.max_activities {
        return Err(ApiError::TooLarge(format!(
            "{count} {what} exceeds the limit of {}",
            config.max_activities
        )));
    }
    Ok(())
}

async fn compute_cpm(
    State(state): State<AppState>,
    payload: Result<Json<CpmRequest>, JsonRejection>,
) -> Result<Json<CpmResponse>, ApiError> {
    let Json(request) = payload?;
    check_size(state.config(), request.activities.len(), "activities")?;

    let response = run_bounded(state.config(), move || {
        let mut network = ActivityNetwork::from_inputs(&request.activities)?;
        let summary = network.compute()?;
        Ok(CpmResponse {
            critical_path: summary.critical_path,
            total_duration: summary.total_duration,
            critical_count: summary.critical_count,
            activities: network.reports(),
        })
    })
    .await?;
    Ok(Json(response))
}

async fn compute_pert(
    State(state): State<AppState>,
    payload: Result<Json<PertRequest>, JsonRejection>,
) -> Result<Json<PertSummary>, ApiError> {
    let Json(request) = payload?;
    check_size(state.config(), request.tasks.len(), "tasks")?;

    let summary = run_bounded(state.config(), move || {
        let tasks = request
            .tasks
            .iter()
            .map(PertTaskInput::to_task)
            .collect::<Result<Vec<_>, _>>()?;
        let estimator = PertEstimator::from_tasks(tasks);
        match request.target_time {
            Some(target) => estimator.summary_against(target),
            None => estimator.summary(),
        }
    })
    .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_overrides() {
        let config = HttpConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, HttpConfig::default());

        let config = HttpConfig::from_lookup(|key| match key {
            ADDR_ENV => Some("127.0.0.1:8080".into()),
            MAX_ACTIVITIES_ENV => Some("25".into()),
            COMPUTE_TIMEOUT_ENV => Some("250".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.max_activities, 25);
        assert_eq!(config.compute_timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_config_value_names_variable() {
        let err = HttpConfig::from_lookup(|key| {
            (key == MAX_ACTIVITIES_ENV).then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value 'lots' for PERT_CPM_MAX_ACTIVITIES"
        );
    }
}
