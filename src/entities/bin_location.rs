use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bin location master data: the smallest addressable storage slot within a
/// zone/center. Owned by the external location service; read-only here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bin_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub center_name: String,
    pub zone: String,
    #[sea_orm(unique)]
    pub bin_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_position::Entity")]
    InventoryPosition,
}

impl Related<super::inventory_position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryPosition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
