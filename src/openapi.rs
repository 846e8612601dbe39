//! OpenAPI document aggregation.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quartermaster API",
        description = "Chapter-house inventory and reservation tracker"
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::confirm_email,
        crate::handlers::auth::request_password_reset,
        crate::handlers::auth::confirm_password_reset,
        crate::handlers::items::list_items,
        crate::handlers::items::get_item,
        crate::handlers::items::create_item,
        crate::handlers::items::edit_item,
        crate::handlers::items::delete_item,
        crate::handlers::items::assign_unit,
        crate::handlers::items::assign_shelf,
        crate::handlers::items::assign_container,
        crate::handlers::items::remove_from_container,
        crate::handlers::reservations::list_reservations,
        crate::handlers::reservations::get_reservation,
        crate::handlers::reservations::create_reservation,
        crate::handlers::reservations::edit_reservation,
        crate::handlers::reservations::delete_reservation,
        crate::handlers::reservations::approve_reservation,
        crate::handlers::reservations::revoke_reservation,
        crate::handlers::brothers::list_brothers,
        crate::handlers::brothers::get_brother,
        crate::handlers::brothers::grant_admin,
        crate::handlers::brothers::revoke_admin,
        crate::handlers::brothers::delete_brother,
        crate::handlers::units::list_units,
        crate::handlers::units::get_unit,
        crate::handlers::units::create_unit,
        crate::handlers::units::edit_unit,
        crate::handlers::units::delete_unit,
        crate::handlers::units::list_shelves,
        crate::handlers::units::create_shelf,
        crate::handlers::units::edit_shelf,
        crate::handlers::units::delete_shelf,
        crate::handlers::containers::list_containers,
        crate::handlers::containers::create_container,
        crate::handlers::containers::edit_container,
        crate::handlers::containers::delete_container,
        crate::handlers::containers::assign_unit,
        crate::handlers::containers::assign_shelf,
        crate::handlers::maintenance::repair_locations,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::MessageResponse,
        crate::handlers::BrotherResponse,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::SessionResponse,
        crate::handlers::auth::PasswordResetRequest,
        crate::handlers::auth::PasswordResetConfirm,
        crate::handlers::items::AssignUnitRequest,
        crate::handlers::items::AssignShelfRequest,
        crate::handlers::items::AssignContainerRequest,
        crate::services::brothers::NewBrother,
        crate::services::inventory::NewItem,
        crate::services::inventory::UpdateItem,
        crate::services::inventory::RepairReport,
        crate::services::locations::NewUnit,
        crate::services::locations::NewShelf,
        crate::services::locations::NewContainer,
        crate::services::locations::RenameLocation,
        crate::services::reservations::NewReservation,
        crate::services::reservations::UpdateReservation,
    )),
    tags(
        (name = "auth", description = "Registration, login, confirmation, reset"),
        (name = "items", description = "Item registry and location assignment"),
        (name = "reservations", description = "Reservation ledger and approval"),
        (name = "brothers", description = "Member administration"),
        (name = "units", description = "Storage units and shelves"),
        (name = "containers", description = "Containers"),
        (name = "maintenance", description = "Out-of-band repair operations"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
