//! Registration, login, email confirmation, and password reset.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::{BrotherResponse, MessageResponse};
use crate::services::brothers::NewBrother;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/confirm-email/:token", get(confirm_email))
        .route("/password-reset/request", post(request_password_reset))
        .route("/password-reset/confirm", post(confirm_password_reset))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub brother: BrotherResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = NewBrother,
    responses(
        (status = 201, description = "Account created, confirmation mail sent", body = BrotherResponse),
        (status = 400, description = "Invalid form input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email or username already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<NewBrother>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.brothers.register(input).await?;
    Ok((StatusCode::CREATED, Json(BrotherResponse::from(created))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = SessionResponse),
        (status = 401, description = "Bad credentials or unconfirmed email", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (token, brother) = state
        .brothers
        .authenticate(&input.email, &input.password)
        .await?;
    Ok(Json(SessionResponse {
        token,
        brother: BrotherResponse::from(brother),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/confirm-email/{token}",
    responses(
        (status = 200, description = "Email confirmed", body = MessageResponse),
        (status = 401, description = "Invalid or expired link", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.brothers.confirm_email(&token).await?;
    Ok(Json(MessageResponse::new(
        "You have confirmed your account. Thanks!",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset/request",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset link mailed", body = MessageResponse),
        (status = 404, description = "Unknown email", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    state.brothers.request_password_reset(&input.email).await?;
    Ok(Json(MessageResponse::new(
        "A link to reset has been sent to the address you provided",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset/confirm",
    request_body = PasswordResetConfirm,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "New password fails the complexity rule", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid or expired link", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetConfirm>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .brothers
        .reset_password(&input.token, &input.new_password)
        .await?;
    Ok(Json(MessageResponse::new(
        "You have successfully reset your password!",
    )))
}
