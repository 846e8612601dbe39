use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_brothers_table::Migration),
            Box::new(m20240101_000002_create_storage_tables::Migration),
            Box::new(m20240101_000003_create_items_table::Migration),
            Box::new(m20240101_000004_create_reservations_table::Migration),
        ]
    }
}

mod m20240101_000001_create_brothers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_brothers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Brothers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Brothers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Brothers::Email)
                                .string_len(60)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Brothers::Username)
                                .string_len(60)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Brothers::FirstName).string_len(60).not_null())
                        .col(ColumnDef::new(Brothers::LastName).string_len(60).not_null())
                        .col(ColumnDef::new(Brothers::PasswordHash).string_len(128).not_null())
                        .col(
                            ColumnDef::new(Brothers::IsAdmin)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Brothers::EmailConfirmed)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Brothers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Brothers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_brothers_email")
                        .table(Brothers::Table)
                        .col(Brothers::Email)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Brothers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Brothers {
        Table,
        Id,
        Email,
        Username,
        FirstName,
        LastName,
        PasswordHash,
        IsAdmin,
        EmailConfirmed,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_storage_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_storage_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StorageUnits::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StorageUnits::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StorageUnits::Name).string_len(60).not_null())
                        .col(ColumnDef::new(StorageUnits::Location).string_len(60).not_null())
                        .col(
                            ColumnDef::new(StorageUnits::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageUnits::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Shelves::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shelves::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Shelves::Name).string_len(20).not_null())
                        .col(ColumnDef::new(Shelves::UnitId).integer().null())
                        .col(
                            ColumnDef::new(Shelves::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Shelves::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shelves_unit_id")
                                .from(Shelves::Table, Shelves::UnitId)
                                .to(StorageUnits::Table, StorageUnits::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Containers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Containers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Containers::Name).string_len(20).not_null())
                        .col(ColumnDef::new(Containers::UnitId).integer().null())
                        .col(ColumnDef::new(Containers::ShelfId).integer().null())
                        .col(
                            ColumnDef::new(Containers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Containers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_containers_unit_id")
                                .from(Containers::Table, Containers::UnitId)
                                .to(StorageUnits::Table, StorageUnits::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_containers_shelf_id")
                                .from(Containers::Table, Containers::ShelfId)
                                .to(Shelves::Table, Shelves::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shelves_unit_id")
                        .table(Shelves::Table)
                        .col(Shelves::UnitId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Containers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Shelves::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StorageUnits::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum StorageUnits {
        Table,
        Id,
        Name,
        Location,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Shelves {
        Table,
        Id,
        Name,
        UnitId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Containers {
        Table,
        Id,
        Name,
        UnitId,
        ShelfId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_items_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000002_create_storage_tables::{Containers, Shelves, StorageUnits};

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Items::Name)
                                .string_len(60)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Items::Description).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Items::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Items::UnitId).integer().null())
                        .col(ColumnDef::new(Items::ShelfId).integer().null())
                        .col(ColumnDef::new(Items::ContainerId).integer().null())
                        .col(
                            ColumnDef::new(Items::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_unit_id")
                                .from(Items::Table, Items::UnitId)
                                .to(StorageUnits::Table, StorageUnits::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_shelf_id")
                                .from(Items::Table, Items::ShelfId)
                                .to(Shelves::Table, Shelves::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_container_id")
                                .from(Items::Table, Items::ContainerId)
                                .to(Containers::Table, Containers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_unit_id")
                        .table(Items::Table)
                        .col(Items::UnitId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_shelf_id")
                        .table(Items::Table)
                        .col(Items::ShelfId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Items {
        Table,
        Id,
        Name,
        Description,
        Quantity,
        UnitId,
        ShelfId,
        ContainerId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_reservations_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_brothers_table::Brothers;
    use super::m20240101_000003_create_items_table::Items;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_reservations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Reservations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Reservations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Reservations::Reason).string_len(200).not_null())
                        .col(ColumnDef::new(Reservations::FromDate).date().not_null())
                        .col(ColumnDef::new(Reservations::ToDate).date().not_null())
                        .col(ColumnDef::new(Reservations::ReservedBy).string_len(60).not_null())
                        .col(ColumnDef::new(Reservations::ItemName).string_len(60).not_null())
                        .col(
                            ColumnDef::new(Reservations::Approved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Reservations::BrotherId).integer().null())
                        .col(ColumnDef::new(Reservations::ItemId).integer().null())
                        .col(
                            ColumnDef::new(Reservations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_reservations_brother_id")
                                .from(Reservations::Table, Reservations::BrotherId)
                                .to(Brothers::Table, Brothers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_reservations_item_id")
                                .from(Reservations::Table, Reservations::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_brother_id")
                        .table(Reservations::Table)
                        .col(Reservations::BrotherId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_item_id")
                        .table(Reservations::Table)
                        .col(Reservations::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Reservations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Reservations {
        Table,
        Id,
        Reason,
        FromDate,
        ToDate,
        ReservedBy,
        ItemName,
        Approved,
        BrotherId,
        ItemId,
        CreatedAt,
        UpdatedAt,
    }
}
