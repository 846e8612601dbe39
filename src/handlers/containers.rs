//! Container routes. Browsing is open to any member; mutations are
//! admin-gated.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::CurrentUser;
use crate::errors::ServiceError;
use crate::handlers::items::{AssignShelfRequest, AssignUnitRequest};
use crate::handlers::MessageResponse;
use crate::services::locations::{ContainerFilter, NewContainer, RenameLocation};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_containers).post(create_container))
        .route(
            "/:id",
            axum::routing::put(edit_container).delete(delete_container),
        )
        .route("/:id/assign-unit", post(assign_unit))
        .route("/:id/assign-shelf", post(assign_shelf))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContainerListQuery {
    pub shelf_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/containers",
    params(ContainerListQuery),
    responses(
        (status = 200, description = "Containers, optionally scoped to a shelf"),
        (status = 401, description = "Not authenticated", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn list_containers(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ContainerListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = match query.shelf_id {
        Some(shelf_id) => ContainerFilter::ByShelf(shelf_id),
        None => ContainerFilter::All,
    };
    Ok(Json(state.locations.list_containers(filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/containers",
    request_body = NewContainer,
    responses(
        (status = 201, description = "Container created; shelf placement adopts the shelf's unit"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn create_container(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<NewContainer>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let created = state.locations.create_container(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/containers/{id}",
    request_body = RenameLocation,
    responses(
        (status = 200, description = "Container renamed"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn edit_container(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<RenameLocation>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.locations.edit_container(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/containers/{id}",
    responses(
        (status = 200, description = "Container deleted; item links nulled", body = MessageResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn delete_container(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    state.locations.delete_container(id).await?;
    Ok(Json(MessageResponse::new(
        "You have successfully deleted the container.",
    )))
}

#[utoipa::path(
    post,
    operation_id = "assign_container_unit",
    path = "/api/v1/containers/{id}/assign-unit",
    request_body = AssignUnitRequest,
    responses(
        (status = 200, description = "Unit assigned"),
        (status = 422, description = "No units exist", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn assign_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<AssignUnitRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(
        state
            .locations
            .assign_unit_container(id, input.unit_id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    operation_id = "assign_container_shelf",
    path = "/api/v1/containers/{id}/assign-shelf",
    request_body = AssignShelfRequest,
    responses(
        (status = 200, description = "Shelf assigned"),
        (status = 412, description = "Container has no unit yet", body = crate::errors::ErrorResponse),
        (status = 422, description = "The unit has no shelves", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn assign_shelf(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<AssignShelfRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(
        state
            .locations
            .assign_shelf_container(id, input.shelf_id)
            .await?,
    ))
}
