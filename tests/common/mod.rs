//! Shared setup for integration tests: an in-memory SQLite pool with the
//! embedded migrations applied, plus master-data seed helpers.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tokio::sync::mpsc;

use stockledger_api::{
    db::{self, DbConfig},
    entities::{bin_location, inventory_position, item, user_account},
    events::{Event, EventSender},
    services::{adjustment::AdjustmentService, movement::MovementService},
};

/// One-connection in-memory SQLite pool; a larger pool would hand each
/// connection its own empty database.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    Arc::new(pool)
}

/// Builds both write-side services sharing one event channel. The receiver is
/// returned so tests can keep it alive or assert on emitted events.
pub fn setup_services(
    db: Arc<DatabaseConnection>,
) -> (MovementService, AdjustmentService, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(64);
    let sender = Arc::new(EventSender::new(tx));
    (
        MovementService::new(db.clone(), sender.clone()),
        AdjustmentService::new(db, sender),
        rx,
    )
}

pub async fn create_item(db: &DatabaseConnection, sku: &str, name: &str) -> item::Model {
    item::ActiveModel {
        sku: Set(sku.to_string()),
        name: Set(name.to_string()),
        price: Set(1000),
        category_id: Set(1),
        safety_stock: Set(5),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to create item")
}

pub async fn create_bin(
    db: &DatabaseConnection,
    bin_code: &str,
    center_name: &str,
    zone: &str,
    is_active: bool,
) -> bin_location::Model {
    bin_location::ActiveModel {
        center_name: Set(center_name.to_string()),
        zone: Set(zone.to_string()),
        bin_code: Set(bin_code.to_string()),
        is_active: Set(is_active),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to create bin location")
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> user_account::Model {
    user_account::ActiveModel {
        username: Set(username.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to create user account")
}

pub async fn create_position(
    db: &DatabaseConnection,
    item_id: i64,
    bin_location_id: i64,
    quantity: i32,
) -> inventory_position::Model {
    inventory_position::ActiveModel {
        item_id: Set(item_id),
        bin_location_id: Set(bin_location_id),
        quantity: Set(quantity),
        version: Set(0),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to create inventory position")
}
