use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_items_table::Migration),
            Box::new(m20260101_000002_create_bin_locations_table::Migration),
            Box::new(m20260101_000003_create_user_accounts_table::Migration),
            Box::new(m20260101_000004_create_inventory_positions_table::Migration),
            Box::new(m20260101_000005_create_stock_transactions_table::Migration),
        ]
    }
}

// Migration implementations

mod m20260101_000001_create_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Item master data, aligned with entities::item Model
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::Sku)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Items::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Items::Price).integer().not_null())
                        .col(ColumnDef::new(Items::CategoryId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Items::SafetyStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Items::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_items_category_id")
                        .table(Items::Table)
                        .col(Items::CategoryId)
                        .if_not_exists()
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
    pub enum Items {
        Table,
        Id,
        Sku,
        Name,
        Price,
        CategoryId,
        SafetyStock,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000002_create_bin_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_bin_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Bin location master data, aligned with entities::bin_location Model
            manager
                .create_table(
                    Table::create()
                        .table(BinLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BinLocations::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BinLocations::CenterName)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(ColumnDef::new(BinLocations::Zone).string_len(30).not_null())
                        .col(
                            ColumnDef::new(BinLocations::BinCode)
                                .string_len(30)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(BinLocations::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(BinLocations::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(BinLocations::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_bin_locations_center_zone")
                        .table(BinLocations::Table)
                        .col(BinLocations::CenterName)
                        .col(BinLocations::Zone)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BinLocations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum BinLocations {
        Table,
        Id,
        CenterName,
        Zone,
        BinCode,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000003_create_user_accounts_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_user_accounts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Operator identity reference for audit stamps and display joins
            manager
                .create_table(
                    Table::create()
                        .table(UserAccounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserAccounts::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(UserAccounts::Username)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserAccounts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum UserAccounts {
        Table,
        Id,
        Username,
    }
}

mod m20260101_000004_create_inventory_positions_table {

    use sea_orm_migration::prelude::*;

    use super::m20260101_000001_create_items_table::Items;
    use super::m20260101_000002_create_bin_locations_table::BinLocations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_inventory_positions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // One row per (item, bin); quantity kept non-negative by the services
            manager
                .create_table(
                    Table::create()
                        .table(InventoryPositions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryPositions::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryPositions::ItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryPositions::BinLocationId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryPositions::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryPositions::Version)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryPositions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryPositions::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_positions_item_id")
                                .from(InventoryPositions::Table, InventoryPositions::ItemId)
                                .to(Items::Table, Items::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_positions_bin_location_id")
                                .from(InventoryPositions::Table, InventoryPositions::BinLocationId)
                                .to(BinLocations::Table, BinLocations::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_inventory_positions_item_bin")
                        .table(InventoryPositions::Table)
                        .col(InventoryPositions::ItemId)
                        .col(InventoryPositions::BinLocationId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryPositions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InventoryPositions {
        Table,
        Id,
        ItemId,
        BinLocationId,
        Quantity,
        Version,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000005_create_stock_transactions_table {

    use sea_orm_migration::prelude::*;

    use super::m20260101_000001_create_items_table::Items;
    use super::m20260101_000002_create_bin_locations_table::BinLocations;
    use super::m20260101_000003_create_user_accounts_table::UserAccounts;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000005_create_stock_transactions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Append-only; the autoincrement id doubles as the tie-break in
            // the total order (occurred_at, id)
            manager
                .create_table(
                    Table::create()
                        .table(StockTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockTransactions::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::TransactionType)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::ItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::FromBinLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::ToBinLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::OccurredAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransactions::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockTransactions::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_transactions_item_id")
                                .from(StockTransactions::Table, StockTransactions::ItemId)
                                .to(Items::Table, Items::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_transactions_from_bin")
                                .from(StockTransactions::Table, StockTransactions::FromBinLocationId)
                                .to(BinLocations::Table, BinLocations::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_transactions_to_bin")
                                .from(StockTransactions::Table, StockTransactions::ToBinLocationId)
                                .to(BinLocations::Table, BinLocations::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_transactions_user_id")
                                .from(StockTransactions::Table, StockTransactions::UserId)
                                .to(UserAccounts::Table, UserAccounts::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_transactions_occurred_at")
                        .table(StockTransactions::Table)
                        .col(StockTransactions::OccurredAt)
                        .col(StockTransactions::Id)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_transactions_item_id")
                        .table(StockTransactions::Table)
                        .col(StockTransactions::ItemId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockTransactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum StockTransactions {
        Table,
        Id,
        TransactionType,
        ItemId,
        FromBinLocationId,
        ToBinLocationId,
        Quantity,
        OccurredAt,
        UserId,
        Notes,
    }
}
