//! Inventory and reservation tracking backend for a chapter house.
//!
//! Items live in a Unit → Shelf → Container storage hierarchy; registered
//! members ("brothers") reserve them for date ranges subject to admin
//! approval. State changes that matter to a member go out as mail through the
//! [`mail::Mailer`] collaborator.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod mail;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod validation;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;

pub use errors::ServiceError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: auth::AuthService,
    pub brothers: services::brothers::BrotherService,
    pub inventory: services::inventory::InventoryService,
    pub locations: services::locations::LocationService,
    pub reservations: services::reservations::ReservationService,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        mailer: Arc<dyn mail::Mailer>,
    ) -> Self {
        let auth = auth::AuthService::new(
            config.jwt_secret.clone(),
            config.token_salt.clone(),
            config.session_ttl_secs,
        );
        let brothers = services::brothers::BrotherService::new(
            db.clone(),
            auth.clone(),
            mailer.clone(),
            config.public_base_url.clone(),
        );
        let inventory = services::inventory::InventoryService::new(db.clone());
        let locations = services::locations::LocationService::new(db.clone());
        let reservations =
            services::reservations::ReservationService::new(db.clone(), mailer);

        Self {
            db,
            config,
            auth,
            brothers,
            inventory,
            locations,
            reservations,
        }
    }
}

/// Composes the full route tree.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/health", handlers::health::router())
        .nest("/api/v1/auth", handlers::auth::router())
        .nest("/api/v1/items", handlers::items::router())
        .nest("/api/v1/reservations", handlers::reservations::router())
        .nest("/api/v1/brothers", handlers::brothers::router())
        .nest("/api/v1/units", handlers::units::router())
        .nest("/api/v1/containers", handlers::containers::router())
        .nest("/api/v1/maintenance", handlers::maintenance::router())
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .with_state(state)
}
