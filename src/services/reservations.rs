//! Reservation ledger: date-validated claims on items with an admin
//! approval gate.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{brother, item, reservation};
use crate::errors::ServiceError;
use crate::mail::{templates, Mailer};
use crate::validation;

/// What happens to the `approved` flag when a reservation is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Member-initiated edits send the reservation back for re-approval.
    Reset,
    /// Admin edits leave the standing approval decision in place.
    Preserve,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewReservation {
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub item_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReservation {
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
pub enum ReservationFilter {
    All,
    ByItem(i32),
    ByBrother(i32),
}

#[derive(Clone)]
pub struct ReservationService {
    db: Arc<DatabaseConnection>,
    mailer: Arc<dyn Mailer>,
}

impl ReservationService {
    pub fn new(db: Arc<DatabaseConnection>, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, mailer }
    }

    fn check_dates(from_date: NaiveDate, to_date: NaiveDate) -> Result<(), ServiceError> {
        validation::reservation_dates(from_date, to_date, Utc::now().date_naive())
            .map_err(|violation| ServiceError::Validation(violation.to_string()))
    }

    /// Creates a pending reservation for `actor`, snapshotting the display
    /// names so the ledger stays readable after renames or deletes.
    #[instrument(skip(self, actor, input), fields(brother_id = actor.id))]
    pub async fn create(
        &self,
        actor: &brother::Model,
        input: NewReservation,
    ) -> Result<reservation::Model, ServiceError> {
        input.validate()?;
        validation::required(&input.reason)
            .map_err(|violation| ServiceError::Validation(format!("reason {violation}")))?;
        Self::check_dates(input.from_date, input.to_date)?;

        let item = item::Entity::find_by_id(input.item_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", input.item_id)))?;

        let created = reservation::ActiveModel {
            reason: Set(input.reason),
            from_date: Set(input.from_date),
            to_date: Set(input.to_date),
            reserved_by: Set(actor.display_name()),
            item_name: Set(item.name.clone()),
            approved: Set(false),
            brother_id: Set(Some(actor.id)),
            item_id: Set(Some(item.id)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(reservation_id = created.id, item = %item.name, "reservation created");
        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<reservation::Model, ServiceError> {
        reservation::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("reservation {id} not found")))
    }

    /// Updates reason and dates. The `policy` decides whether the standing
    /// approval survives the edit.
    #[instrument(skip(self, input))]
    pub async fn edit(
        &self,
        id: i32,
        input: UpdateReservation,
        policy: ApprovalPolicy,
    ) -> Result<reservation::Model, ServiceError> {
        input.validate()?;
        validation::required(&input.reason)
            .map_err(|violation| ServiceError::Validation(format!("reason {violation}")))?;
        Self::check_dates(input.from_date, input.to_date)?;

        let existing = self.get(id).await?;
        let mut active: reservation::ActiveModel = existing.into();
        active.reason = Set(input.reason);
        active.from_date = Set(input.from_date);
        active.to_date = Set(input.to_date);
        if policy == ApprovalPolicy::Reset {
            active.approved = Set(false);
        }

        let updated = active.update(self.db.as_ref()).await?;
        info!(reservation_id = id, ?policy, "reservation edited");
        Ok(updated)
    }

    pub async fn approve(&self, id: i32) -> Result<reservation::Model, ServiceError> {
        self.set_approval(id, true).await
    }

    pub async fn revoke(&self, id: i32) -> Result<reservation::Model, ServiceError> {
        self.set_approval(id, false).await
    }

    /// Flips the approval flag and notifies the owning brother. The
    /// notification goes out on every call, re-approvals included.
    #[instrument(skip(self))]
    async fn set_approval(&self, id: i32, approved: bool) -> Result<reservation::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut active: reservation::ActiveModel = existing.into();
        active.approved = Set(approved);
        let updated = active.update(self.db.as_ref()).await?;

        if let Some(brother_id) = updated.brother_id {
            if let Some(owner) = brother::Entity::find_by_id(brother_id)
                .one(self.db.as_ref())
                .await?
            {
                let (subject, body) = if approved {
                    templates::reservation_approved(&updated.item_name)
                } else {
                    templates::reservation_revoked(&updated.item_name)
                };
                self.mailer.send(&owner.email, &subject, &body).await?;
            }
        }

        info!(reservation_id = id, approved, "reservation approval updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(self.db.as_ref()).await?;
        info!(reservation_id = id, "reservation deleted");
        Ok(())
    }

    /// Lists reservations in ascending id order.
    pub async fn list(
        &self,
        filter: ReservationFilter,
    ) -> Result<Vec<reservation::Model>, ServiceError> {
        let mut query = reservation::Entity::find();
        match filter {
            ReservationFilter::All => {}
            ReservationFilter::ByItem(item_id) => {
                query = query.filter(reservation::Column::ItemId.eq(item_id));
            }
            ReservationFilter::ByBrother(brother_id) => {
                query = query.filter(reservation::Column::BrotherId.eq(brother_id));
            }
        }
        Ok(query
            .order_by_asc(reservation::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }
}
