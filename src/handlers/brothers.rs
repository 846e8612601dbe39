//! Member administration routes. All admin-gated.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::auth::CurrentUser;
use crate::errors::ServiceError;
use crate::handlers::{BrotherResponse, MessageResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brothers))
        .route("/:id", get(get_brother).delete(delete_brother))
        .route("/:id/grant-admin", post(grant_admin))
        .route("/:id/revoke-admin", post(revoke_admin))
}

#[utoipa::path(
    get,
    path = "/api/v1/brothers",
    responses(
        (status = 200, description = "All registered members", body = [BrotherResponse]),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "brothers"
)]
pub async fn list_brothers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let brothers = state.brothers.list().await?;
    Ok(Json(
        brothers
            .into_iter()
            .map(BrotherResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/brothers/{id}",
    responses(
        (status = 200, description = "Member found", body = BrotherResponse),
        (status = 404, description = "No such member", body = crate::errors::ErrorResponse)
    ),
    tag = "brothers"
)]
pub async fn get_brother(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(BrotherResponse::from(state.brothers.get(id).await?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/brothers/{id}/grant-admin",
    responses(
        (status = 200, description = "Admin granted; the member has been mailed", body = BrotherResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "brothers"
)]
pub async fn grant_admin(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(BrotherResponse::from(
        state.brothers.grant_admin(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/brothers/{id}/revoke-admin",
    responses(
        (status = 200, description = "Admin revoked; the member has been mailed", body = BrotherResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "brothers"
)]
pub async fn revoke_admin(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(BrotherResponse::from(
        state.brothers.revoke_admin(id).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/brothers/{id}",
    responses(
        (status = 200, description = "Member deleted along with their reservations", body = MessageResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "brothers"
)]
pub async fn delete_brother(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let removed = state.brothers.delete(id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Brother successfully deleted along with {removed} reservation(s)."
    ))))
}
