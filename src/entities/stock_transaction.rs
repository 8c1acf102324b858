use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kinds of ledger transactions.
///
/// `Inbound` and `Outbound` belong to the external receiving/shipping
/// collaborator; no operation in this service produces them, but the history
/// filter accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Inbound,
    Outbound,
    Movement,
    Adjustment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Inbound => "INBOUND",
            TransactionType::Outbound => "OUTBOUND",
            TransactionType::Movement => "MOVEMENT",
            TransactionType::Adjustment => "ADJUSTMENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INBOUND" => Some(TransactionType::Inbound),
            "OUTBOUND" => Some(TransactionType::Outbound),
            "MOVEMENT" => Some(TransactionType::Movement),
            "ADJUSTMENT" => Some(TransactionType::Adjustment),
            _ => None,
        }
    }
}

/// Append-only audit record. One row per successful ledger mutation; rows are
/// never updated or deleted. The total order is `occurred_at`, then `id`.
///
/// `quantity` is a positive magnitude for MOVEMENT and a signed delta for
/// ADJUSTMENT. MOVEMENT rows carry both bins; ADJUSTMENT rows carry neither.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transaction_type: String,
    pub item_id: i64,
    pub from_bin_location_id: Option<i64>,
    pub to_bin_location_id: Option<i64>,
    pub quantity: i32,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub notes: Option<String>,
}

impl Model {
    /// Typed view of the stored `transaction_type` discriminator.
    pub fn transaction_type(&self) -> Option<TransactionType> {
        TransactionType::from_str(&self.transaction_type)
    }
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
        from = "Column::FromBinLocationId",
        to = "super::bin_location::Column::Id"
    )]
    FromBin,
    #[sea_orm(
        belongs_to = "super::bin_location::Entity",
        from = "Column::ToBinLocationId",
        to = "super::bin_location::Column::Id"
    )]
    ToBin,
    #[sea_orm(
        belongs_to = "super::user_account::Entity",
        from = "Column::UserId",
        to = "super::user_account::Column::Id"
    )]
    User,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::user_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.occurred_at {
            active_model.occurred_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}
