//! Out-of-band maintenance operations.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};

use crate::auth::CurrentUser;
use crate::errors::ServiceError;
use crate::services::inventory::RepairReport;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/repair-locations", post(repair_locations))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance/repair-locations",
    responses(
        (status = 200, description = "Repair pass complete", body = RepairReport),
        (status = 403, description = "Admin capability required", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn repair_locations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.inventory.repair_locations().await?))
}
