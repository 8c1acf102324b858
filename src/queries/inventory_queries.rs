use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{bin_location, inventory_position, item};
use crate::errors::ServiceError;
use crate::queries::Query;

/// Filters for the inventory summary view. All fields are optional and
/// combine conjunctively.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct InventorySearchCondition {
    /// Item name substring
    pub name: Option<String>,
    /// Exact SKU
    pub sku: Option<String>,
    pub category_id: Option<i64>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub center_name: Option<String>,
    pub zone: Option<String>,
    pub bin_code: Option<String>,
    /// Only positions holding at least this quantity
    pub min_quantity: Option<i32>,
}

/// One row of the inventory summary view: position joined with its item and
/// bin attributes.
#[derive(Debug, Clone, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct InventorySummaryRow {
    pub inventory_id: i64,
    pub quantity: i32,
    pub item_id: i64,
    pub item_name: String,
    pub sku: String,
    pub price: i32,
    pub category_id: i64,
    pub center_name: String,
    pub zone: String,
    pub bin_code: String,
}

/// Paginated inventory summary, sorted by item name then position id.
#[derive(Debug, Clone)]
pub struct SearchInventoryQuery {
    pub condition: InventorySearchCondition,
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
impl Query for SearchInventoryQuery {
    type Result = (Vec<InventorySummaryRow>, u64);

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let cond = &self.condition;

        let mut select = inventory_position::Entity::find()
            .join(JoinType::InnerJoin, inventory_position::Relation::Item.def())
            .join(
                JoinType::InnerJoin,
                inventory_position::Relation::BinLocation.def(),
            )
            .select_only()
            .column_as(inventory_position::Column::Id, "inventory_id")
            .column_as(inventory_position::Column::Quantity, "quantity")
            .column_as(item::Column::Id, "item_id")
            .column_as(item::Column::Name, "item_name")
            .column_as(item::Column::Sku, "sku")
            .column_as(item::Column::Price, "price")
            .column_as(item::Column::CategoryId, "category_id")
            .column_as(bin_location::Column::CenterName, "center_name")
            .column_as(bin_location::Column::Zone, "zone")
            .column_as(bin_location::Column::BinCode, "bin_code");

        if let Some(name) = &cond.name {
            select = select.filter(item::Column::Name.contains(name.as_str()));
        }
        if let Some(sku) = &cond.sku {
            select = select.filter(item::Column::Sku.eq(sku.as_str()));
        }
        if let Some(category_id) = cond.category_id {
            select = select.filter(item::Column::CategoryId.eq(category_id));
        }
        if let Some(min_price) = cond.min_price {
            select = select.filter(item::Column::Price.gte(min_price));
        }
        if let Some(max_price) = cond.max_price {
            select = select.filter(item::Column::Price.lte(max_price));
        }
        if let Some(center_name) = &cond.center_name {
            select = select.filter(bin_location::Column::CenterName.eq(center_name.as_str()));
        }
        if let Some(zone) = &cond.zone {
            select = select.filter(bin_location::Column::Zone.eq(zone.as_str()));
        }
        if let Some(bin_code) = &cond.bin_code {
            select = select.filter(bin_location::Column::BinCode.eq(bin_code.as_str()));
        }
        if let Some(min_quantity) = cond.min_quantity {
            select = select.filter(inventory_position::Column::Quantity.gte(min_quantity));
        }

        let select = select
            .order_by_asc(item::Column::Name)
            .order_by_asc(inventory_position::Column::Id);

        let page = self.page.max(1);
        let limit = self.limit.max(1);
        let paginator = select
            .into_model::<InventorySummaryRow>()
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((rows, total))
    }
}

/// Current quantity of one item in one bin, addressed the way the floor
/// addresses it: by SKU-less item id and bin code.
#[derive(Debug, Clone)]
pub struct GetPositionQuery {
    pub item_id: i64,
    pub bin_code: String,
}

/// Position lookup result. `quantity` is 0 when no stock was ever recorded
/// for the pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionView {
    pub item_id: i64,
    pub sku: String,
    pub bin_location_id: i64,
    pub bin_code: String,
    pub quantity: i32,
}

#[async_trait]
impl Query for GetPositionQuery {
    type Result = PositionView;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let item = item::Entity::find_by_id(self.item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", self.item_id)))?;

        let bin = bin_location::Entity::find()
            .filter(bin_location::Column::BinCode.eq(self.bin_code.as_str()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("bin {} not found", self.bin_code)))?;

        let quantity =
            crate::services::ledger::position_quantity(db, item.id, bin.id).await?;

        Ok(PositionView {
            item_id: item.id,
            sku: item.sku,
            bin_location_id: bin.id,
            bin_code: bin.bin_code,
            quantity,
        })
    }
}
