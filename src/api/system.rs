//! System API endpoints: liveness/readiness probes and a status summary.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db_connected: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub users: u64,
    pub passengers: u64,
    pub trips: u64,
    pub sites: u64,
}

/// `GET /api/health`
///
/// Public liveness probe reporting whether the store answers.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let db_connected = state.store().ping().await.is_ok();

    let body = HealthResponse {
        status: if db_connected { "OK" } else { "DEGRADED" },
        db_connected,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if db_connected {
        (StatusCode::OK, Json(body)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

/// `GET /api/system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let store = state.store();

    let (users, passengers, trips, sites) = futures::try_join!(
        store.count_users(),
        store.count_passengers(),
        store.count_trips(),
        async { Ok::<u64, anyhow::Error>(store.list_sites().await?.len() as u64) },
    )?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        users,
        passengers,
        trips,
        sites,
    })))
}
