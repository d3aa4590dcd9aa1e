use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SetPobRequest, SiteDto};
use crate::api::validation::validate_site_name;

pub async fn list_sites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SiteDto>>>, ApiError> {
    let sites = state.site_service.list().await?;
    Ok(Json(ApiResponse::success(
        sites.into_iter().map(SiteDto::from).collect(),
    )))
}

/// POST /sites/initialize
///
/// Seeds the configured sites with POB 0. Calling it again changes nothing.
pub async fn initialize_sites(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SiteDto>>>), ApiError> {
    let sites = state.site_service.initialize().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            sites.into_iter().map(SiteDto::from).collect(),
        )),
    ))
}

/// PUT /sites/{name}/pob
/// Manual POB update; creates the site with defaults if it is unknown.
pub async fn set_pob(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(payload): Json<SetPobRequest>,
) -> Result<Json<ApiResponse<SiteDto>>, ApiError> {
    let name = validate_site_name(&name)?;

    let site = state.site_service.set_pob(name, payload.current_pob).await?;

    Ok(Json(ApiResponse::success(site.into())))
}
