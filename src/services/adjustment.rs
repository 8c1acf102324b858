use std::sync::Arc;

use sea_orm::{EntityTrait, TransactionError, TransactionTrait};
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::{
        inventory_position,
        stock_transaction::{self, TransactionType},
        user_account,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        ledger::{self, NewStockTransaction},
        MAX_CONFLICT_RETRIES,
    },
};

/// Signed correction to one position's quantity, with a mandatory reason.
#[derive(Debug, Clone)]
pub struct AdjustmentCommand {
    pub inventory_position_id: i64,
    pub adjustment_quantity: i32,
    pub notes: String,
}

/// Executes quantity adjustments against the stock ledger.
#[derive(Clone)]
pub struct AdjustmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl AdjustmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Applies a signed delta to a position and appends the ADJUSTMENT record
    /// in the same transaction.
    ///
    /// ADJUSTMENT records carry no bin references; the position row already
    /// names its bin. Retries on version conflicts like movements do.
    #[instrument(skip(self, command), fields(position_id = command.inventory_position_id, delta = command.adjustment_quantity))]
    pub async fn record_adjustment(
        &self,
        command: AdjustmentCommand,
        user_id: i64,
    ) -> Result<stock_transaction::Model, ServiceError> {
        if command.adjustment_quantity == 0 {
            return Err(ServiceError::ValidationError(
                "adjustment quantity must be non-zero".to_string(),
            ));
        }
        if command.notes.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "adjustment requires a reason in notes".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        user_account::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("user {} not found", user_id)))?;

        let mut attempt = 0;
        let (record, position) = loop {
            let result = self
                .execute(
                    command.inventory_position_id,
                    command.adjustment_quantity,
                    command.notes.clone(),
                    user_id,
                )
                .await;

            match result {
                Err(ServiceError::ConcurrencyConflict(what)) if attempt < MAX_CONFLICT_RETRIES => {
                    attempt += 1;
                    warn!(attempt, %what, "adjustment hit concurrent writer, retrying");
                }
                other => break other?,
            }
        };

        info!(
            transaction_id = record.id,
            position_id = position.id,
            item_id = position.item_id,
            delta = command.adjustment_quantity,
            new_quantity = position.quantity,
            "adjustment recorded"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::StockAdjusted {
                transaction_id: record.id,
                position_id: position.id,
                item_id: position.item_id,
                delta: command.adjustment_quantity,
                new_quantity: position.quantity,
            })
            .await
        {
            warn!("failed to emit StockAdjusted event: {}", e);
        }

        Ok(record)
    }

    /// One transactional attempt: re-read the position, apply the delta,
    /// append the ADJUSTMENT record.
    async fn execute(
        &self,
        position_id: i64,
        delta: i32,
        notes: String,
        user_id: i64,
    ) -> Result<(stock_transaction::Model, inventory_position::Model), ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, (stock_transaction::Model, inventory_position::Model), ServiceError>(
            move |txn| {
                Box::pin(async move {
                    let position = inventory_position::Entity::find_by_id(position_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "inventory position {} not found",
                                position_id
                            ))
                        })?;

                    let updated = ledger::apply_delta(txn, &position, delta).await?;

                    let record = ledger::append_transaction(
                        txn,
                        NewStockTransaction {
                            transaction_type: TransactionType::Adjustment,
                            item_id: position.item_id,
                            from_bin_location_id: None,
                            to_bin_location_id: None,
                            quantity: delta,
                            user_id,
                            notes: Some(notes),
                        },
                    )
                    .await?;

                    Ok((record, updated))
                })
            },
        )
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }
}
