//! Item registry: CRUD plus the location-assignment rules that keep the
//! Unit → Shelf → Container hierarchy consistent.

use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{container, item, reservation, shelf, storage_unit};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewItem {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: String,
    pub unit_id: Option<i32>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: String,
    pub unit_id: Option<i32>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy)]
pub enum ItemFilter {
    All,
    ByUnit(i32),
    ByShelf(i32),
    ByContainer(i32),
}

/// Outcome of a [`InventoryService::repair_locations`] pass.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RepairReport {
    /// Items with a shelf link that were examined.
    pub examined: u64,
    /// Shelf links cleared because the shelf was gone or unit-less.
    pub shelves_cleared: u64,
    /// Unit links adopted from the item's shelf.
    pub units_adopted: u64,
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
        let mut query = item::Entity::find().filter(item::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(item::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Duplicate(format!(
                "an item named {name:?} already exists"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: NewItem) -> Result<item::Model, ServiceError> {
        input.validate()?;
        self.ensure_name_free(&input.name, None).await?;

        if let Some(unit_id) = input.unit_id {
            storage_unit::Entity::find_by_id(unit_id)
                .one(self.db.as_ref())
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("unit {unit_id} not found")))?;
        }

        let created = item::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            quantity: Set(input.quantity),
            unit_id: Set(input.unit_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(item_id = created.id, name = %created.name, "item created");
        Ok(created)
    }

    pub async fn get_item(&self, id: i32) -> Result<item::Model, ServiceError> {
        item::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("item {id} not found")))
    }

    /// Edits an item. Moving it to a different unit clears the shelf link:
    /// an item cannot stay on a shelf belonging to its old unit.
    #[instrument(skip(self, input))]
    pub async fn edit_item(&self, id: i32, input: UpdateItem) -> Result<item::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_item(id).await?;
        self.ensure_name_free(&input.name, Some(id)).await?;

        if let Some(unit_id) = input.unit_id {
            storage_unit::Entity::find_by_id(unit_id)
                .one(self.db.as_ref())
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("unit {unit_id} not found")))?;
        }

        let unit_changed = existing.unit_id != input.unit_id;
        let mut active: item::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.quantity = Set(input.quantity);
        active.unit_id = Set(input.unit_id);
        if unit_changed {
            active.shelf_id = Set(None);
        }

        let updated = active.update(self.db.as_ref()).await?;
        info!(item_id = id, unit_changed, "item edited");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn assign_unit(&self, item_id: i32, unit_id: i32) -> Result<item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;

        if storage_unit::Entity::find().count(self.db.as_ref()).await? == 0 {
            return Err(ServiceError::NoCandidates("there are no units".to_string()));
        }
        let unit = storage_unit::Entity::find_by_id(unit_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("unit {unit_id} not found")))?;

        let mut active: item::ActiveModel = item.into();
        active.unit_id = Set(Some(unit.id));
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Shelf assignment requires the unit level to be set first, and the
    /// shelf must live in the item's unit.
    #[instrument(skip(self))]
    pub async fn assign_shelf(&self, item_id: i32, shelf_id: i32) -> Result<item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;
        let unit_id = item.unit_id.ok_or_else(|| {
            ServiceError::Precondition("assign a unit to the item first".to_string())
        })?;

        let shelf_count = shelf::Entity::find()
            .filter(shelf::Column::UnitId.eq(unit_id))
            .count(self.db.as_ref())
            .await?;
        if shelf_count == 0 {
            return Err(ServiceError::NoCandidates(
                "there are no shelves in this unit".to_string(),
            ));
        }

        let shelf = shelf::Entity::find_by_id(shelf_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("shelf {shelf_id} not found")))?;
        if shelf.unit_id != Some(unit_id) {
            return Err(ServiceError::Validation(format!(
                "shelf {shelf_id} belongs to a different unit"
            )));
        }

        let mut active: item::ActiveModel = item.into();
        active.shelf_id = Set(Some(shelf.id));
        Ok(active.update(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn assign_container(
        &self,
        item_id: i32,
        container_id: i32,
    ) -> Result<item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;

        if container::Entity::find().count(self.db.as_ref()).await? == 0 {
            return Err(ServiceError::NoCandidates(
                "there are no containers".to_string(),
            ));
        }
        let target = container::Entity::find_by_id(container_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("container {container_id} not found")))?;

        let mut active: item::ActiveModel = item.into();
        active.container_id = Set(Some(target.id));
        Ok(active.update(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove_from_container(&self, item_id: i32) -> Result<item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;
        if item.container_id.is_none() {
            return Err(ServiceError::NoOp(
                "item has no container to remove".to_string(),
            ));
        }
        let mut active: item::ActiveModel = item.into();
        active.container_id = Set(None);
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes an item. Reservations keep their name snapshot; the dangling
    /// link is nulled out explicitly.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> Result<(), ServiceError> {
        let item = self.get_item(id).await?;

        reservation::Entity::update_many()
            .col_expr(reservation::Column::ItemId, Expr::value(Option::<i32>::None))
            .filter(reservation::Column::ItemId.eq(id))
            .exec(self.db.as_ref())
            .await?;

        item.delete(self.db.as_ref()).await?;
        info!(item_id = id, "item deleted");
        Ok(())
    }

    /// Lists items in ascending id order. A pure read: stale location links
    /// are reconciled only by [`Self::repair_locations`], never here.
    pub async fn list_items(&self, filter: ItemFilter) -> Result<Vec<item::Model>, ServiceError> {
        let mut query = item::Entity::find();
        match filter {
            ItemFilter::All => {}
            ItemFilter::ByUnit(unit_id) => {
                query = query.filter(item::Column::UnitId.eq(unit_id));
            }
            ItemFilter::ByShelf(shelf_id) => {
                query = query.filter(item::Column::ShelfId.eq(shelf_id));
            }
            ItemFilter::ByContainer(container_id) => {
                query = query.filter(item::Column::ContainerId.eq(container_id));
            }
        }
        Ok(query
            .order_by_asc(item::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Maintenance pass over shelved items, invoked out-of-band by an admin.
    ///
    /// For every item with a shelf link: clears the link when the shelf is
    /// gone or belongs to no unit; adopts the shelf's unit when the item has
    /// none of its own.
    #[instrument(skip(self))]
    pub async fn repair_locations(&self) -> Result<RepairReport, ServiceError> {
        let mut report = RepairReport::default();

        let shelved = item::Entity::find()
            .filter(item::Column::ShelfId.is_not_null())
            .all(self.db.as_ref())
            .await?;

        for item in shelved {
            report.examined += 1;
            let shelf = match item.shelf_id {
                Some(shelf_id) => {
                    shelf::Entity::find_by_id(shelf_id)
                        .one(self.db.as_ref())
                        .await?
                }
                None => None,
            };

            match shelf.and_then(|s| s.unit_id) {
                Some(unit_id) if item.unit_id.is_none() => {
                    let mut active: item::ActiveModel = item.into();
                    active.unit_id = Set(Some(unit_id));
                    active.update(self.db.as_ref()).await?;
                    report.units_adopted += 1;
                }
                Some(_) => {}
                None => {
                    let mut active: item::ActiveModel = item.into();
                    active.shelf_id = Set(None);
                    active.update(self.db.as_ref()).await?;
                    report.shelves_cleared += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            shelves_cleared = report.shelves_cleared,
            units_adopted = report.units_adopted,
            "location repair pass complete"
        );
        Ok(report)
    }
}
