use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Current quantity of one item in one bin.
///
/// Rows are created on the first movement-in to a bin (upsert-on-first-write)
/// and never deleted; a drained position stays at quantity 0 so the audit
/// trail keeps a stable anchor. `version` backs the optimistic concurrency
/// check: every quantity update is filtered on the version it read and bumps
/// it by one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub item_id: i64,
    pub bin_location_id: i64,
    pub quantity: i32,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::bin_location::Entity",
        from = "Column::BinLocationId",
        to = "super::bin_location::Column::Id"
    )]
    BinLocation,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::bin_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BinLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
