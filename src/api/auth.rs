use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::validate_email;
use crate::db::User;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub api_key: String,
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct ResetTokenResponse {
    pub reset_token: String,
    pub expires_in_minutes: i64,
}

#[derive(Deserialize)]
pub struct ResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authenticated identity attached to every protected request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Admin gate for the mutating passenger/user routes.
pub fn require_admin(user: &CurrentUser) -> Result<(), ApiError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "This operation requires an administrator account".to_string(),
        ))
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks, in order:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// On success the resolved [`CurrentUser`] is attached to the request so
/// handlers can apply the admin gate without a second lookup.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Check session first (fastest path for web clients)
    if let Ok(Some(email)) = session.get::<String>("user").await
        && let Ok(Some(user)) = state.store().get_user_by_email(&email).await
    {
        tracing::Span::current().record("user_id", &user.email);
        request.extensions_mut().insert(CurrentUser::from(&user));
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers)
        && let Ok(Some(user)) = state.store().verify_api_key(&key).await
    {
        tracing::Span::current().record("user_id", &user.email);
        request.extensions_mut().insert(CurrentUser::from(&user));
        return Ok(next.run(request).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    // Check X-Api-Key header
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    // Check Authorization: Bearer header
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with email and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let is_valid = state
        .store()
        .verify_user_password(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = state
        .store()
        .get_user_by_email(&payload.email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    if let Err(e) = session.insert("user", &payload.email).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    Ok(Json(ApiResponse::success(LoginResponse {
        email: user.email,
        api_key: user.api_key,
        is_admin: user.is_admin,
    })))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Get the authenticated user's record
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    axum::extract::Extension(current): axum::extract::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<super::UserDto>>, ApiError> {
    let user = state
        .store()
        .get_user_by_email(&current.email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    Ok(Json(ApiResponse::success(user.into())))
}

/// PUT /auth/password
/// Change password (requires current password verification)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    axum::extract::Extension(current): axum::extract::Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::validation(
            "New password must be at least 8 characters",
        ));
    }

    if payload.current_password == payload.new_password {
        return Err(ApiError::validation(
            "New password must be different from current password",
        ));
    }

    let is_valid = state
        .store()
        .verify_user_password(&current.email, &payload.current_password)
        .await
        .map_err(|e| ApiError::internal(format!("Password verification error: {e}")))?;

    if !is_valid {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    let security = state.config().read().await.security.clone();
    state
        .store()
        .update_user_password(&current.email, &payload.new_password, Some(&security))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update password: {e}")))?;

    tracing::info!("Password changed for user: {}", current.email);

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}

/// GET /auth/api-key
/// Get the current API key
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    axum::extract::Extension(current): axum::extract::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state
        .store()
        .get_user_api_key(&current.email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get API key: {e}")))?
        .ok_or_else(|| ApiError::internal("API key not found"))?;

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}

/// POST /auth/api-key/regenerate
/// Generate a new random API key
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    axum::extract::Extension(current): axum::extract::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let new_api_key = state
        .store()
        .regenerate_user_api_key(&current.email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to regenerate API key: {e}")))?;

    tracing::info!("API key regenerated for user: {}", current.email);

    Ok(Json(ApiResponse::success(ApiKeyResponse {
        api_key: new_api_key,
    })))
}

/// POST /auth/password-reset/request
///
/// Issues a one-shot reset token for the given account. There is no mail
/// integration; the token comes back in the response for the operator to
/// hand over out of band.
pub async fn request_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ApiResponse<ResetTokenResponse>>, ApiError> {
    let email = validate_email(&payload.email)?;

    let token = state
        .store()
        .create_password_reset_token(email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create reset token: {e}")))?
        .ok_or_else(|| ApiError::user_not_found(email))?;

    tracing::info!("Password reset token issued for user: {}", email);

    Ok(Json(ApiResponse::success(ResetTokenResponse {
        reset_token: token,
        expires_in_minutes: 60,
    })))
}

/// POST /auth/password-reset/confirm
/// Consume a reset token and set a new password.
pub async fn confirm_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetConfirmRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::validation(
            "New password must be at least 8 characters",
        ));
    }

    let security = state.config().read().await.security.clone();
    let reset = state
        .store()
        .reset_password_with_token(&payload.token, &payload.new_password, Some(&security))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to reset password: {e}")))?;

    if !reset {
        return Err(ApiError::validation("Reset token is invalid or expired"));
    }

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password reset successfully".to_string(),
    })))
}
