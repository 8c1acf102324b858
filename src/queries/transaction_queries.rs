use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{
    bin_location, item,
    stock_transaction::{self, TransactionType},
    user_account,
};
use crate::errors::ServiceError;
use crate::queries::Query;

/// Filters for the transaction history view. All fields are optional and
/// combine conjunctively; the date range is inclusive on both ends.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TransactionSearchCondition {
    /// Transaction type (INBOUND, OUTBOUND, MOVEMENT, ADJUSTMENT)
    pub transaction_type: Option<TransactionType>,
    pub item_id: Option<i64>,
    /// Exact item SKU
    pub item_sku: Option<String>,
    /// Operator username
    pub username: Option<String>,
    pub from_bin_code: Option<String>,
    pub to_bin_code: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// One row of the transaction history view, with item, bin, and operator
/// attributes joined in for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionHistoryRow {
    pub transaction_id: i64,
    pub transaction_type: String,
    pub item_id: i64,
    pub item_name: String,
    pub item_sku: String,
    pub from_bin_code: Option<String>,
    pub from_center_name: Option<String>,
    pub to_bin_code: Option<String>,
    pub to_center_name: Option<String>,
    pub quantity: i32,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: Option<String>,
    pub notes: Option<String>,
}

/// Paginated transaction history, newest first (occurred_at, then id).
#[derive(Debug, Clone)]
pub struct SearchTransactionsQuery {
    pub condition: TransactionSearchCondition,
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
impl Query for SearchTransactionsQuery {
    type Result = (Vec<TransactionHistoryRow>, u64);

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let cond = &self.condition;

        let mut select = stock_transaction::Entity::find();

        if let Some(transaction_type) = cond.transaction_type {
            select = select
                .filter(stock_transaction::Column::TransactionType.eq(transaction_type.as_str()));
        }
        if let Some(item_id) = cond.item_id {
            select = select.filter(stock_transaction::Column::ItemId.eq(item_id));
        }
        // Filters expressed in master-data terms resolve to ids first; an
        // unknown sku/username/bin matches nothing rather than erroring, the
        // same as the equivalent join would.
        if let Some(sku) = &cond.item_sku {
            let Some(item) = item::Entity::find()
                .filter(item::Column::Sku.eq(sku.as_str()))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
            else {
                return Ok((Vec::new(), 0));
            };
            select = select.filter(stock_transaction::Column::ItemId.eq(item.id));
        }
        if let Some(username) = &cond.username {
            let Some(user) = user_account::Entity::find()
                .filter(user_account::Column::Username.eq(username.as_str()))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
            else {
                return Ok((Vec::new(), 0));
            };
            select = select.filter(stock_transaction::Column::UserId.eq(user.id));
        }
        if let Some(bin_code) = &cond.from_bin_code {
            let Some(bin) = find_bin(db, bin_code).await? else {
                return Ok((Vec::new(), 0));
            };
            select = select.filter(stock_transaction::Column::FromBinLocationId.eq(bin.id));
        }
        if let Some(bin_code) = &cond.to_bin_code {
            let Some(bin) = find_bin(db, bin_code).await? else {
                return Ok((Vec::new(), 0));
            };
            select = select.filter(stock_transaction::Column::ToBinLocationId.eq(bin.id));
        }
        if let Some(start_date) = cond.start_date {
            select = select.filter(stock_transaction::Column::OccurredAt.gte(start_date));
        }
        if let Some(end_date) = cond.end_date {
            select = select.filter(stock_transaction::Column::OccurredAt.lte(end_date));
        }

        let select = select
            .order_by_desc(stock_transaction::Column::OccurredAt)
            .order_by_desc(stock_transaction::Column::Id);

        let page = self.page.max(1);
        let limit = self.limit.max(1);
        let paginator = select.paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let transactions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        let rows = assemble_rows(db, transactions).await?;
        Ok((rows, total))
    }
}

async fn find_bin(
    db: &DatabaseConnection,
    bin_code: &str,
) -> Result<Option<bin_location::Model>, ServiceError> {
    bin_location::Entity::find()
        .filter(bin_location::Column::BinCode.eq(bin_code))
        .one(db)
        .await
        .map_err(ServiceError::db_error)
}

/// Batch-loads the items, bins, and users referenced by one page of
/// transactions and joins them in memory.
async fn assemble_rows(
    db: &DatabaseConnection,
    transactions: Vec<stock_transaction::Model>,
) -> Result<Vec<TransactionHistoryRow>, ServiceError> {
    let item_ids: Vec<i64> = transactions.iter().map(|t| t.item_id).collect();
    let user_ids: Vec<i64> = transactions.iter().map(|t| t.user_id).collect();
    let bin_ids: Vec<i64> = transactions
        .iter()
        .flat_map(|t| [t.from_bin_location_id, t.to_bin_location_id])
        .flatten()
        .collect();

    let items: HashMap<i64, item::Model> = item::Entity::find()
        .filter(item::Column::Id.is_in(item_ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let users: HashMap<i64, user_account::Model> = user_account::Entity::find()
        .filter(user_account::Column::Id.is_in(user_ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let bins: HashMap<i64, bin_location::Model> = bin_location::Entity::find()
        .filter(bin_location::Column::Id.is_in(bin_ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let rows = transactions
        .into_iter()
        .map(|t| {
            let item = items.get(&t.item_id);
            let from_bin = t.from_bin_location_id.and_then(|id| bins.get(&id));
            let to_bin = t.to_bin_location_id.and_then(|id| bins.get(&id));
            TransactionHistoryRow {
                transaction_id: t.id,
                transaction_type: t.transaction_type.clone(),
                item_id: t.item_id,
                item_name: item.map(|i| i.name.clone()).unwrap_or_default(),
                item_sku: item.map(|i| i.sku.clone()).unwrap_or_default(),
                from_bin_code: from_bin.map(|b| b.bin_code.clone()),
                from_center_name: from_bin.map(|b| b.center_name.clone()),
                to_bin_code: to_bin.map(|b| b.bin_code.clone()),
                to_center_name: to_bin.map(|b| b.center_name.clone()),
                quantity: t.quantity,
                occurred_at: t.occurred_at,
                user_id: t.user_id,
                username: users.get(&t.user_id).map(|u| u.username.clone()),
                notes: t.notes,
            }
        })
        .collect();

    Ok(rows)
}
