//! Read-side projections over the ledger.
//!
//! Queries never mutate state and see only committed rows; re-running the
//! same query with no intervening writes returns identical results.

pub mod inventory_queries;
pub mod transaction_queries;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}
