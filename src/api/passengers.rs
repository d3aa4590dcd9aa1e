use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::{CurrentUser, require_admin};
use super::{ApiError, ApiResponse, AppState, PassengerDto, PassengerRequest};
use crate::api::validation::validate_id;
use crate::db::PassengerDraft;
use crate::services::CascadeSummary;

pub async fn list_passengers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PassengerDto>>>, ApiError> {
    let passengers = state.passenger_service.list().await?;
    Ok(Json(ApiResponse::success(
        passengers.into_iter().map(PassengerDto::from).collect(),
    )))
}

pub async fn create_passenger(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<PassengerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PassengerDto>>), ApiError> {
    require_admin(&current)?;

    let passenger = state
        .passenger_service
        .create(PassengerDraft {
            first_name: payload.first_name,
            last_name: payload.last_name,
            job_role: payload.job_role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(passenger.into())),
    ))
}

pub async fn get_passenger(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PassengerDto>>, ApiError> {
    let id = validate_id(id)?;
    let passenger = state.passenger_service.get(id).await?;
    Ok(Json(ApiResponse::success(passenger.into())))
}

pub async fn update_passenger(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<PassengerRequest>,
) -> Result<Json<ApiResponse<PassengerDto>>, ApiError> {
    require_admin(&current)?;
    let id = validate_id(id)?;

    let passenger = state
        .passenger_service
        .update(
            id,
            PassengerDraft {
                first_name: payload.first_name,
                last_name: payload.last_name,
                job_role: payload.job_role,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(passenger.into())))
}

/// DELETE /passengers/{id}
///
/// Removes the passenger and every trip referencing it; the response reports
/// how many trips went with it.
pub async fn delete_passenger(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CascadeSummary>>, ApiError> {
    require_admin(&current)?;
    let id = validate_id(id)?;

    let summary = state.passenger_service.delete_cascade(id).await?;

    Ok(Json(ApiResponse::success(summary)))
}
