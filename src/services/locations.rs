//! Storage hierarchy: units, shelves, and containers.
//!
//! Deleting a location never cascades into the things stored there. The
//! policy is set-null, applied explicitly so the rows read consistently even
//! on stores without enforced foreign keys.

use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{container, item, shelf, storage_unit};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewUnit {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewShelf {
    #[validate(length(min = 1, max = 20))]
    pub name: String,
}

/// A container may be created on a shelf (adopting the shelf's unit), in a
/// unit directly, or with no location at all pending later assignment.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewContainer {
    #[validate(length(min = 1, max = 20))]
    pub name: String,
    pub shelf_id: Option<i32>,
    pub unit_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RenameLocation {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
pub enum ContainerFilter {
    All,
    ByShelf(i32),
}

#[derive(Clone)]
pub struct LocationService {
    db: Arc<DatabaseConnection>,
}

impl LocationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // Units

    #[instrument(skip(self, input))]
    pub async fn create_unit(&self, input: NewUnit) -> Result<storage_unit::Model, ServiceError> {
        input.validate()?;
        let created = storage_unit::ActiveModel {
            name: Set(input.name),
            location: Set(input.location),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(unit_id = created.id, name = %created.name, "unit created");
        Ok(created)
    }

    pub async fn get_unit(&self, id: i32) -> Result<storage_unit::Model, ServiceError> {
        storage_unit::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("unit {id} not found")))
    }

    #[instrument(skip(self, input))]
    pub async fn edit_unit(&self, id: i32, input: NewUnit) -> Result<storage_unit::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_unit(id).await?;
        let mut active: storage_unit::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.location = Set(input.location);
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a unit, nulling the unit link on its shelves, containers, and
    /// items. Shelf links left pointing through the deleted unit are the
    /// repair pass's concern.
    #[instrument(skip(self))]
    pub async fn delete_unit(&self, id: i32) -> Result<(), ServiceError> {
        let unit = self.get_unit(id).await?;

        shelf::Entity::update_many()
            .col_expr(shelf::Column::UnitId, Expr::value(Option::<i32>::None))
            .filter(shelf::Column::UnitId.eq(id))
            .exec(self.db.as_ref())
            .await?;
        container::Entity::update_many()
            .col_expr(container::Column::UnitId, Expr::value(Option::<i32>::None))
            .filter(container::Column::UnitId.eq(id))
            .exec(self.db.as_ref())
            .await?;
        item::Entity::update_many()
            .col_expr(item::Column::UnitId, Expr::value(Option::<i32>::None))
            .filter(item::Column::UnitId.eq(id))
            .exec(self.db.as_ref())
            .await?;

        unit.delete(self.db.as_ref()).await?;
        info!(unit_id = id, "unit deleted");
        Ok(())
    }

    pub async fn list_units(&self) -> Result<Vec<storage_unit::Model>, ServiceError> {
        Ok(storage_unit::Entity::find()
            .order_by_asc(storage_unit::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    // Shelves

    #[instrument(skip(self, input))]
    pub async fn create_shelf(&self, unit_id: i32, input: NewShelf) -> Result<shelf::Model, ServiceError> {
        input.validate()?;
        self.get_unit(unit_id).await?;
        let created = shelf::ActiveModel {
            name: Set(input.name),
            unit_id: Set(Some(unit_id)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(shelf_id = created.id, unit_id, "shelf created");
        Ok(created)
    }

    pub async fn get_shelf(&self, id: i32) -> Result<shelf::Model, ServiceError> {
        shelf::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("shelf {id} not found")))
    }

    #[instrument(skip(self, input))]
    pub async fn edit_shelf(&self, id: i32, input: NewShelf) -> Result<shelf::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_shelf(id).await?;
        let mut active: shelf::ActiveModel = existing.into();
        active.name = Set(input.name);
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a shelf, nulling the shelf link on containers and items.
    #[instrument(skip(self))]
    pub async fn delete_shelf(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get_shelf(id).await?;

        container::Entity::update_many()
            .col_expr(container::Column::ShelfId, Expr::value(Option::<i32>::None))
            .filter(container::Column::ShelfId.eq(id))
            .exec(self.db.as_ref())
            .await?;
        item::Entity::update_many()
            .col_expr(item::Column::ShelfId, Expr::value(Option::<i32>::None))
            .filter(item::Column::ShelfId.eq(id))
            .exec(self.db.as_ref())
            .await?;

        existing.delete(self.db.as_ref()).await?;
        info!(shelf_id = id, "shelf deleted");
        Ok(())
    }

    pub async fn list_shelves(&self, unit_id: i32) -> Result<Vec<shelf::Model>, ServiceError> {
        self.get_unit(unit_id).await?;
        Ok(shelf::Entity::find()
            .filter(shelf::Column::UnitId.eq(unit_id))
            .order_by_asc(shelf::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    // Containers

    #[instrument(skip(self, input))]
    pub async fn create_container(&self, input: NewContainer) -> Result<container::Model, ServiceError> {
        input.validate()?;

        let (unit_id, shelf_id) = match input.shelf_id {
            Some(shelf_id) => {
                let shelf = self.get_shelf(shelf_id).await?;
                (shelf.unit_id, Some(shelf_id))
            }
            None => {
                if let Some(unit_id) = input.unit_id {
                    self.get_unit(unit_id).await?;
                }
                (input.unit_id, None)
            }
        };

        let created = container::ActiveModel {
            name: Set(input.name),
            unit_id: Set(unit_id),
            shelf_id: Set(shelf_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(container_id = created.id, "container created");
        Ok(created)
    }

    pub async fn get_container(&self, id: i32) -> Result<container::Model, ServiceError> {
        container::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("container {id} not found")))
    }

    #[instrument(skip(self, input))]
    pub async fn edit_container(&self, id: i32, input: RenameLocation) -> Result<container::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_container(id).await?;
        let mut active: container::ActiveModel = existing.into();
        active.name = Set(input.name);
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a container, nulling the container link on items.
    #[instrument(skip(self))]
    pub async fn delete_container(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get_container(id).await?;

        item::Entity::update_many()
            .col_expr(item::Column::ContainerId, Expr::value(Option::<i32>::None))
            .filter(item::Column::ContainerId.eq(id))
            .exec(self.db.as_ref())
            .await?;

        existing.delete(self.db.as_ref()).await?;
        info!(container_id = id, "container deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn assign_unit_container(
        &self,
        container_id: i32,
        unit_id: i32,
    ) -> Result<container::Model, ServiceError> {
        let existing = self.get_container(container_id).await?;

        if storage_unit::Entity::find().count(self.db.as_ref()).await? == 0 {
            return Err(ServiceError::NoCandidates("there are no units".to_string()));
        }
        let unit = storage_unit::Entity::find_by_id(unit_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("unit {unit_id} not found")))?;

        let mut active: container::ActiveModel = existing.into();
        active.unit_id = Set(Some(unit.id));
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Shelf assignment for containers follows the same rules as for items:
    /// a unit must already be set, and the shelf must live in that unit.
    #[instrument(skip(self))]
    pub async fn assign_shelf_container(
        &self,
        container_id: i32,
        shelf_id: i32,
    ) -> Result<container::Model, ServiceError> {
        let existing = self.get_container(container_id).await?;
        let unit_id = existing.unit_id.ok_or_else(|| {
            ServiceError::Precondition("assign a unit to the container first".to_string())
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

        let target = shelf::Entity::find_by_id(shelf_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("shelf {shelf_id} not found")))?;
        if target.unit_id != Some(unit_id) {
            return Err(ServiceError::Validation(format!(
                "shelf {shelf_id} belongs to a different unit"
            )));
        }

        let mut active: container::ActiveModel = existing.into();
        active.shelf_id = Set(Some(target.id));
        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn list_containers(
        &self,
        filter: ContainerFilter,
    ) -> Result<Vec<container::Model>, ServiceError> {
        let mut query = container::Entity::find();
        if let ContainerFilter::ByShelf(shelf_id) = filter {
            query = query.filter(container::Column::ShelfId.eq(shelf_id));
        }
        Ok(query
            .order_by_asc(container::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }
}
