use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::{CurrentUser, require_admin};
use super::{ApiError, ApiResponse, AppState, CreateUserRequest, DeletedDto, UpdateUserRequest, UserDto};
use crate::api::validation::validate_email;
use crate::db::{NewUser, UserUpdate};

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.store().list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    require_admin(&current)?;

    let email = validate_email(&payload.email)?.to_string();
    if payload.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    let security = state.config().read().await.security.clone();
    let user = state
        .store()
        .create_user(
            NewUser {
                email,
                password: payload.password,
                first_name: payload.first_name,
                last_name: payload.last_name,
                is_admin: payload.is_admin,
                home_location: payload.home_location,
            },
            Some(&security),
        )
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("User with this email already exists".to_string())
        })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let email = validate_email(&email)?;

    let user = state
        .store()
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| ApiError::user_not_found(email))?;

    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(email): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_admin(&current)?;
    let email = validate_email(&email)?;

    let user = state
        .store()
        .update_user(
            email,
            UserUpdate {
                first_name: payload.first_name,
                last_name: payload.last_name,
                is_admin: payload.is_admin,
                home_location: payload.home_location,
            },
        )
        .await?
        .ok_or_else(|| ApiError::user_not_found(email))?;

    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn verify_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_admin(&current)?;
    let email = validate_email(&email)?;

    let user = state
        .store()
        .verify_user(email)
        .await?
        .ok_or_else(|| ApiError::user_not_found(email))?;

    tracing::info!("User verified: {}", email);

    Ok(Json(ApiResponse::success(user.into())))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    require_admin(&current)?;
    let email = validate_email(&email)?;

    if !state.store().delete_user(email).await? {
        return Err(ApiError::user_not_found(email));
    }

    Ok(Json(ApiResponse::success(DeletedDto {
        message: "User deleted successfully".to_string(),
    })))
}
