use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionError, TransactionTrait};
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::{
        bin_location, item,
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

/// Transfer of quantity between two bins for one item.
#[derive(Debug, Clone)]
pub struct MovementCommand {
    pub item_id: i64,
    pub from_bin_code: String,
    pub to_bin_code: String,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Executes bin-to-bin movements against the stock ledger.
#[derive(Clone)]
pub struct MovementService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MovementService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Moves `quantity` of an item from one bin to another.
    ///
    /// The source decrement, destination increment, and MOVEMENT record
    /// append commit as one transaction; on a version conflict the whole
    /// transaction is retried from a fresh read, a bounded number of times.
    #[instrument(skip(self, command), fields(item_id = command.item_id, quantity = command.quantity))]
    pub async fn record_movement(
        &self,
        command: MovementCommand,
        user_id: i64,
    ) -> Result<stock_transaction::Model, ServiceError> {
        if command.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "movement quantity must be greater than zero".to_string(),
            ));
        }
        if command.from_bin_code == command.to_bin_code {
            return Err(ServiceError::InvalidRoute(format!(
                "source and destination bins are both {}",
                command.from_bin_code
            )));
        }

        let db = self.db_pool.as_ref();

        let item = item::Entity::find_by_id(command.item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("item {} not found", command.item_id))
            })?;

        user_account::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("user {} not found", user_id)))?;

        let from_bin = find_bin_by_code(db, &command.from_bin_code).await?;
        let to_bin = find_bin_by_code(db, &command.to_bin_code).await?;

        if !from_bin.is_active {
            return Err(ServiceError::InvalidRoute(format!(
                "source bin {} is inactive",
                from_bin.bin_code
            )));
        }
        if !to_bin.is_active {
            return Err(ServiceError::InvalidRoute(format!(
                "destination bin {} is inactive",
                to_bin.bin_code
            )));
        }

        let mut attempt = 0;
        let record = loop {
            let result = self
                .execute(
                    item.id,
                    from_bin.id,
                    to_bin.id,
                    command.quantity,
                    command.notes.clone(),
                    user_id,
                )
                .await;

            match result {
                Err(ServiceError::ConcurrencyConflict(what)) if attempt < MAX_CONFLICT_RETRIES => {
                    attempt += 1;
                    warn!(attempt, %what, "movement hit concurrent writer, retrying");
                }
                other => break other?,
            }
        };

        info!(
            transaction_id = record.id,
            item_id = item.id,
            from_bin = %from_bin.bin_code,
            to_bin = %to_bin.bin_code,
            quantity = command.quantity,
            "movement recorded"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::StockMoved {
                transaction_id: record.id,
                item_id: item.id,
                from_bin_location_id: from_bin.id,
                to_bin_location_id: to_bin.id,
                quantity: command.quantity,
            })
            .await
        {
            warn!("failed to emit StockMoved event: {}", e);
        }

        Ok(record)
    }

    /// One transactional attempt: decrement source, upsert destination,
    /// append the MOVEMENT record.
    async fn execute(
        &self,
        item_id: i64,
        from_bin_id: i64,
        to_bin_id: i64,
        quantity: i32,
        notes: Option<String>,
        user_id: i64,
    ) -> Result<stock_transaction::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        db.transaction::<_, stock_transaction::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let source = ledger::find_position(txn, item_id, from_bin_id)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "no stock position for item {} in source bin {}",
                            item_id, from_bin_id
                        ))
                    })?;

                ledger::apply_delta(txn, &source, -quantity).await?;
                ledger::add_to_position(txn, item_id, to_bin_id, quantity).await?;

                ledger::append_transaction(
                    txn,
                    NewStockTransaction {
                        transaction_type: TransactionType::Movement,
                        item_id,
                        from_bin_location_id: Some(from_bin_id),
                        to_bin_location_id: Some(to_bin_id),
                        quantity,
                        user_id,
                        notes,
                    },
                )
                .await
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }
}

async fn find_bin_by_code(
    db: &DbPool,
    bin_code: &str,
) -> Result<bin_location::Model, ServiceError> {
    bin_location::Entity::find()
        .filter(bin_location::Column::BinCode.eq(bin_code))
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("bin {} not found", bin_code)))
}
