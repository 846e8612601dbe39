//! Reservation routes. Members manage their own reservations; the approval
//! gate and cross-member visibility belong to admins.

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
use crate::entities::reservation;
use crate::errors::ServiceError;
use crate::handlers::MessageResponse;
use crate::services::reservations::{
    ApprovalPolicy, NewReservation, ReservationFilter, UpdateReservation,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route(
            "/:id",
            get(get_reservation)
                .put(edit_reservation)
                .delete(delete_reservation),
        )
        .route("/:id/approve", post(approve_reservation))
        .route("/:id/revoke", post(revoke_reservation))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationListQuery {
    pub item_id: Option<i32>,
    pub brother_id: Option<i32>,
}

/// Loads the reservation and checks the caller may touch it: admins always,
/// members only for their own rows.
async fn load_owned(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
) -> Result<reservation::Model, ServiceError> {
    let existing = state.reservations.get(id).await?;
    if !user.0.is_admin && existing.brother_id != Some(user.0.id) {
        return Err(ServiceError::Forbidden(
            "you may only manage your own reservations".to_string(),
        ));
    }
    Ok(existing)
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    params(ReservationListQuery),
    responses(
        (status = 200, description = "Reservations; members see only their own"),
        (status = 401, description = "Not authenticated", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ReservationListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = if user.0.is_admin {
        match (query.item_id, query.brother_id) {
            (Some(item_id), _) => ReservationFilter::ByItem(item_id),
            (None, Some(brother_id)) => ReservationFilter::ByBrother(brother_id),
            (None, None) => ReservationFilter::All,
        }
    } else {
        ReservationFilter::ByBrother(user.0.id)
    };
    Ok(Json(state.reservations.list(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    responses(
        (status = 200, description = "Reservation found"),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse),
        (status = 404, description = "No such reservation", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(load_owned(&state, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = NewReservation,
    responses(
        (status = 201, description = "Reservation created, pending approval"),
        (status = 400, description = "Date ordering or blank-field violation", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item does not exist", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<NewReservation>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.reservations.create(&user.0, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated; member edits reset approval"),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn edit_reservation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateReservation>,
) -> Result<impl IntoResponse, ServiceError> {
    load_owned(&state, &user, id).await?;
    let policy = if user.0.is_admin {
        ApprovalPolicy::Preserve
    } else {
        ApprovalPolicy::Reset
    };
    Ok(Json(state.reservations.edit(id, input, policy).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    responses(
        (status = 200, description = "Reservation deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    load_owned(&state, &user, id).await?;
    state.reservations.delete(id).await?;
    Ok(Json(MessageResponse::new(
        "You have successfully deleted the reservation.",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/approve",
    responses(
        (status = 200, description = "Reservation approved; the owner has been mailed"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn approve_reservation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.reservations.approve(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/revoke",
    responses(
        (status = 200, description = "Approval revoked; the owner has been mailed"),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn revoke_reservation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.reservations.revoke(id).await?))
}
