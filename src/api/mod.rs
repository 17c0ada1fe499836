pub mod cli;
pub mod logging;

use axum::{
    Router,
    extract::{Json, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    CompareError, CompareOptions, Direction, Metric, compare, normalize_scenarios, rank_scenarios,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    scenarios: Value,
    base_scenario_id: Option<Value>,
    rank_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RankPayload {
    scenarios: Value,
    metric: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricDescriptor {
    metric: Metric,
    label: &'static str,
    direction: Direction,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/metrics", get(metrics_handler))
        .route("/api/compare", post(compare_handler))
        .route("/api/rank", post(rank_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "comparison API listening");
    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn metrics_handler() -> Response {
    let metrics = Metric::ALL
        .into_iter()
        .map(|metric| MetricDescriptor {
            metric,
            label: metric.label(),
            direction: metric.direction(),
        })
        .collect::<Vec<_>>();
    json_response(StatusCode::OK, metrics)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_handler(payload: Result<Json<ComparePayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let options = match compare_options_from_payload(&payload) {
        Ok(options) => options,
        Err(e) => return compare_error_response(e),
    };

    match compare(&payload.scenarios, &options) {
        Ok(report) => {
            info!(
                scenarios = report.scenarios.len(),
                rank_by = %report.rank_by,
                "compare request served"
            );
            json_response(StatusCode::OK, report)
        }
        Err(e) => compare_error_response(e),
    }
}

async fn rank_handler(payload: Result<Json<RankPayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let metric = match payload.metric.as_deref() {
        Some(name) => match name.parse::<Metric>() {
            Ok(metric) => metric,
            Err(e) => return compare_error_response(e),
        },
        None => Metric::default(),
    };

    let scenarios = normalize_scenarios(&payload.scenarios).unwrap_or_default();
    json_response(StatusCode::OK, rank_scenarios(&scenarios, metric))
}

fn compare_options_from_payload(payload: &ComparePayload) -> Result<CompareOptions, CompareError> {
    let rank_by = match payload.rank_by.as_deref() {
        Some(name) => name.parse::<Metric>()?,
        None => Metric::default(),
    };
    // Ids arrive as strings or numbers, mirroring the normalizer.
    let base_scenario_id = match &payload.base_scenario_id {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(CompareError::InvalidPayload(format!(
                "baseScenarioId must be a string or number, got {other}"
            )));
        }
    };
    Ok(CompareOptions {
        base_scenario_id,
        rank_by,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn compare_error_response(e: CompareError) -> Response {
    let status = if e.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    warn!(error = %e, status = status.as_u16(), "comparison request rejected");
    error_response(status, &e.to_string())
}

fn rejection_response(rejection: JsonRejection) -> Response {
    warn!(error = %rejection, "invalid JSON payload");
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("Invalid API JSON payload: {}", rejection.body_text()),
    )
}
