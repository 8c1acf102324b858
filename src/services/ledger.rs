//! Stock ledger store primitives.
//!
//! These run inside the caller's database transaction so that the position
//! update and the transaction-log append of one logical operation commit or
//! roll back together. The movement and adjustment services own the
//! transaction boundary; this module owns the two invariants: quantities
//! never go negative, and every mutation appends exactly one well-formed
//! record.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::entities::{
    inventory_position,
    stock_transaction::{self, TransactionType},
};
use crate::errors::ServiceError;

/// A ledger record about to be appended.
#[derive(Debug, Clone)]
pub struct NewStockTransaction {
    pub transaction_type: TransactionType,
    pub item_id: i64,
    pub from_bin_location_id: Option<i64>,
    pub to_bin_location_id: Option<i64>,
    pub quantity: i32,
    pub user_id: i64,
    pub notes: Option<String>,
}

/// Current quantity for (item, bin); 0 when the position was never recorded.
pub async fn position_quantity<C: ConnectionTrait>(
    db: &C,
    item_id: i64,
    bin_location_id: i64,
) -> Result<i32, ServiceError> {
    let position = find_position(db, item_id, bin_location_id).await?;
    Ok(position.map(|p| p.quantity).unwrap_or(0))
}

/// Looks up the position row for (item, bin), if any.
pub async fn find_position<C: ConnectionTrait>(
    db: &C,
    item_id: i64,
    bin_location_id: i64,
) -> Result<Option<inventory_position::Model>, ServiceError> {
    inventory_position::Entity::find()
        .filter(inventory_position::Column::ItemId.eq(item_id))
        .filter(inventory_position::Column::BinLocationId.eq(bin_location_id))
        .one(db)
        .await
        .map_err(ServiceError::db_error)
}

/// Applies a signed delta to an existing position with an optimistic version
/// check.
///
/// Fails `InsufficientStock` when the result would go negative and
/// `ConcurrencyConflict` when a concurrent writer bumped the version between
/// our read and this update (zero rows matched).
pub async fn apply_delta<C: ConnectionTrait>(
    db: &C,
    position: &inventory_position::Model,
    delta: i32,
) -> Result<inventory_position::Model, ServiceError> {
    let new_quantity = position.quantity + delta;
    if new_quantity < 0 {
        return Err(ServiceError::InsufficientStock(format!(
            "position {} has quantity {}, requested change {}",
            position.id, position.quantity, delta
        )));
    }

    let now = Utc::now();
    let result = inventory_position::Entity::update_many()
        .col_expr(inventory_position::Column::Quantity, Expr::value(new_quantity))
        .col_expr(
            inventory_position::Column::Version,
            Expr::value(position.version + 1),
        )
        .col_expr(inventory_position::Column::UpdatedAt, Expr::value(now))
        .filter(inventory_position::Column::Id.eq(position.id))
        .filter(inventory_position::Column::Version.eq(position.version))
        .exec(db)
        .await
        .map_err(ServiceError::db_error)?;

    if result.rows_affected == 0 {
        return Err(ServiceError::ConcurrencyConflict(format!(
            "position {}",
            position.id
        )));
    }

    Ok(inventory_position::Model {
        quantity: new_quantity,
        version: position.version + 1,
        updated_at: now,
        ..position.clone()
    })
}

/// Adds quantity to the (item, bin) position, creating the row on first
/// movement-in (upsert-on-first-write).
///
/// An insert race on the (item, bin) unique key is reported as
/// `ConcurrencyConflict` so the caller's bounded retry re-reads and lands on
/// the row the winner created.
pub async fn add_to_position<C: ConnectionTrait>(
    db: &C,
    item_id: i64,
    bin_location_id: i64,
    quantity: i32,
) -> Result<inventory_position::Model, ServiceError> {
    if let Some(position) = find_position(db, item_id, bin_location_id).await? {
        return apply_delta(db, &position, quantity).await;
    }

    let now = Utc::now();
    let new_position = inventory_position::ActiveModel {
        item_id: Set(item_id),
        bin_location_id: Set(bin_location_id),
        quantity: Set(quantity),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_position.insert(db).await.map_err(|e| {
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            ServiceError::ConcurrencyConflict(format!(
                "item {} in bin {}",
                item_id, bin_location_id
            ))
        } else {
            ServiceError::db_error(e)
        }
    })
}

/// Appends one record to the immutable transaction log.
///
/// Well-formedness is enforced here, not at the HTTP boundary, so every
/// caller of the store meets the same contract.
pub async fn append_transaction<C: ConnectionTrait>(
    db: &C,
    record: NewStockTransaction,
) -> Result<stock_transaction::Model, ServiceError> {
    validate_transaction(&record)?;

    let row = stock_transaction::ActiveModel {
        transaction_type: Set(record.transaction_type.as_str().to_string()),
        item_id: Set(record.item_id),
        from_bin_location_id: Set(record.from_bin_location_id),
        to_bin_location_id: Set(record.to_bin_location_id),
        quantity: Set(record.quantity),
        occurred_at: Set(Utc::now()),
        user_id: Set(record.user_id),
        notes: Set(record.notes),
        ..Default::default()
    };

    row.insert(db).await.map_err(ServiceError::db_error)
}

fn validate_transaction(record: &NewStockTransaction) -> Result<(), ServiceError> {
    match record.transaction_type {
        TransactionType::Movement => {
            if record.quantity <= 0 {
                return Err(ServiceError::ValidationError(
                    "movement quantity must be positive".to_string(),
                ));
            }
            let (Some(from), Some(to)) = (record.from_bin_location_id, record.to_bin_location_id)
            else {
                return Err(ServiceError::ValidationError(
                    "movement requires both source and destination bins".to_string(),
                ));
            };
            if from == to {
                return Err(ServiceError::ValidationError(
                    "movement source and destination bins must differ".to_string(),
                ));
            }
        }
        TransactionType::Adjustment => {
            if record.quantity == 0 {
                return Err(ServiceError::ValidationError(
                    "adjustment quantity must be non-zero".to_string(),
                ));
            }
            if record.notes.as_deref().map_or(true, |n| n.trim().is_empty()) {
                return Err(ServiceError::ValidationError(
                    "adjustment requires a reason in notes".to_string(),
                ));
            }
            if record.from_bin_location_id.is_some() || record.to_bin_location_id.is_some() {
                return Err(ServiceError::ValidationError(
                    "adjustment records do not carry bin references".to_string(),
                ));
            }
        }
        TransactionType::Inbound => {
            if record.quantity <= 0 || record.to_bin_location_id.is_none() {
                return Err(ServiceError::ValidationError(
                    "inbound requires a positive quantity and a destination bin".to_string(),
                ));
            }
        }
        TransactionType::Outbound => {
            if record.quantity <= 0 || record.from_bin_location_id.is_none() {
                return Err(ServiceError::ValidationError(
                    "outbound requires a positive quantity and a source bin".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(quantity: i32, from: Option<i64>, to: Option<i64>) -> NewStockTransaction {
        NewStockTransaction {
            transaction_type: TransactionType::Movement,
            item_id: 1,
            from_bin_location_id: from,
            to_bin_location_id: to,
            quantity,
            user_id: 1,
            notes: None,
        }
    }

    #[test]
    fn movement_requires_positive_quantity_and_distinct_bins() {
        assert!(validate_transaction(&movement(5, Some(1), Some(2))).is_ok());
        assert!(validate_transaction(&movement(0, Some(1), Some(2))).is_err());
        assert!(validate_transaction(&movement(-3, Some(1), Some(2))).is_err());
        assert!(validate_transaction(&movement(5, Some(1), Some(1))).is_err());
        assert!(validate_transaction(&movement(5, None, Some(2))).is_err());
    }

    #[test]
    fn adjustment_requires_notes_and_no_bins() {
        let mut record = NewStockTransaction {
            transaction_type: TransactionType::Adjustment,
            item_id: 1,
            from_bin_location_id: None,
            to_bin_location_id: None,
            quantity: -4,
            user_id: 1,
            notes: Some("cycle count correction".to_string()),
        };
        assert!(validate_transaction(&record).is_ok());

        record.notes = Some("   ".to_string());
        assert!(validate_transaction(&record).is_err());

        record.notes = Some("damage".to_string());
        record.quantity = 0;
        assert!(validate_transaction(&record).is_err());

        record.quantity = 2;
        record.from_bin_location_id = Some(9);
        assert!(validate_transaction(&record).is_err());
    }
}
