//! HTTP surface. One route tree; per-operation capability checks replace the
//! duplicated admin/self-service handler sets of older designs.

pub mod auth;
pub mod brothers;
pub mod containers;
pub mod health;
pub mod items;
pub mod maintenance;
pub mod reservations;
pub mod units;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::brother;

/// Flash-style acknowledgement body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public view of a member record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrotherResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub email_confirmed: bool,
}

impl From<brother::Model> for BrotherResponse {
    fn from(model: brother::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            is_admin: model.is_admin,
            email_confirmed: model.email_confirmed,
        }
    }
}
