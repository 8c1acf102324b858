use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item master data. Owned by the external item service; read-only here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub price: i32,
    pub category_id: i64,
    pub safety_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_position::Entity")]
    InventoryPosition,
    #[sea_orm(has_many = "super::stock_transaction::Entity")]
    StockTransaction,
}

impl Related<super::inventory_position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryPosition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
