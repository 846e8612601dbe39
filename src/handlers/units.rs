//! Unit and shelf routes. Browsing is open to any member; mutations are
//! admin-gated.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::auth::CurrentUser;
use crate::errors::ServiceError;
use crate::handlers::MessageResponse;
use crate::services::locations::{NewShelf, NewUnit};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_units).post(create_unit))
        .route("/:id", get(get_unit).put(edit_unit).delete(delete_unit))
        .route("/:id/shelves", get(list_shelves).post(create_shelf))
        .route("/shelves/:id", axum::routing::put(edit_shelf).delete(delete_shelf))
}

#[utoipa::path(
    get,
    path = "/api/v1/units",
    responses(
        (status = 200, description = "All storage units"),
        (status = 401, description = "Not authenticated", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn list_units(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.locations.list_units().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    responses(
        (status = 200, description = "Unit found"),
        (status = 404, description = "No such unit", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn get_unit(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.locations.get_unit(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/units",
    request_body = NewUnit,
    responses(
        (status = 201, description = "Unit created"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<NewUnit>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let created = state.locations.create_unit(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/units/{id}",
    request_body = NewUnit,
    responses(
        (status = 200, description = "Unit updated"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn edit_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<NewUnit>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.locations.edit_unit(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/units/{id}",
    responses(
        (status = 200, description = "Unit deleted; shelf, container, and item links nulled", body = MessageResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    state.locations.delete_unit(id).await?;
    Ok(Json(MessageResponse::new(
        "You have successfully deleted the unit.",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/units/{id}/shelves",
    responses(
        (status = 200, description = "Shelves in the unit"),
        (status = 404, description = "No such unit", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn list_shelves(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.locations.list_shelves(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/units/{id}/shelves",
    request_body = NewShelf,
    responses(
        (status = 201, description = "Shelf created in the unit"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn create_shelf(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<NewShelf>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let created = state.locations.create_shelf(id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/units/shelves/{id}",
    request_body = NewShelf,
    responses(
        (status = 200, description = "Shelf renamed"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn edit_shelf(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<NewShelf>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.locations.edit_shelf(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/units/shelves/{id}",
    responses(
        (status = 200, description = "Shelf deleted; container and item links nulled", body = MessageResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "units"
)]
pub async fn delete_shelf(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    state.locations.delete_shelf(id).await?;
    Ok(Json(MessageResponse::new(
        "You have successfully deleted the shelf.",
    )))
}
