//! Item routes. Browsing is open to any member; mutation and location
//! assignment require the admin capability.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::auth::CurrentUser;
use crate::errors::ServiceError;
use crate::handlers::MessageResponse;
use crate::services::inventory::{ItemFilter, NewItem, UpdateItem};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(edit_item).delete(delete_item))
        .route("/:id/assign-unit", post(assign_unit))
        .route("/:id/assign-shelf", post(assign_shelf))
        .route("/:id/assign-container", post(assign_container))
        .route("/:id/container", delete(remove_from_container))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ItemListQuery {
    pub unit_id: Option<i32>,
    pub shelf_id: Option<i32>,
    pub container_id: Option<i32>,
}

impl ItemListQuery {
    fn filter(&self) -> ItemFilter {
        if let Some(shelf_id) = self.shelf_id {
            ItemFilter::ByShelf(shelf_id)
        } else if let Some(unit_id) = self.unit_id {
            ItemFilter::ByUnit(unit_id)
        } else if let Some(container_id) = self.container_id {
            ItemFilter::ByContainer(container_id)
        } else {
            ItemFilter::All
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignUnitRequest {
    pub unit_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignShelfRequest {
    pub shelf_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignContainerRequest {
    pub container_id: i32,
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ItemListQuery),
    responses(
        (status = 200, description = "Items, optionally scoped to a unit, shelf, or container"),
        (status = 401, description = "Not authenticated", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ItemListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.inventory.list_items(query.filter()).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    responses(
        (status = 200, description = "Item found"),
        (status = 404, description = "No such item", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.inventory.get_item(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item name already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<NewItem>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let created = state.inventory.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated; a unit change clears the shelf"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn edit_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateItem>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.inventory.edit_item(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    state.inventory.delete_item(id).await?;
    Ok(Json(MessageResponse::new(
        "You have successfully deleted the item.",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/assign-unit",
    request_body = AssignUnitRequest,
    responses(
        (status = 200, description = "Unit assigned"),
        (status = 422, description = "No units exist", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn assign_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<AssignUnitRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.inventory.assign_unit(id, input.unit_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/assign-shelf",
    request_body = AssignShelfRequest,
    responses(
        (status = 200, description = "Shelf assigned"),
        (status = 412, description = "Item has no unit yet", body = crate::errors::ErrorResponse),
        (status = 422, description = "The unit has no shelves", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn assign_shelf(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<AssignShelfRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.inventory.assign_shelf(id, input.shelf_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/assign-container",
    request_body = AssignContainerRequest,
    responses(
        (status = 200, description = "Container assigned"),
        (status = 422, description = "No containers exist", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn assign_container(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<AssignContainerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(
        state
            .inventory
            .assign_container(id, input.container_id)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}/container",
    responses(
        (status = 200, description = "Item removed from its container"),
        (status = 400, description = "Item has no container", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn remove_from_container(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.inventory.remove_from_container(id).await?))
}
