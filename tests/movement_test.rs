mod common;

use sea_orm::{EntityTrait, PaginatorTrait};
use stockledger_api::{
    entities::stock_transaction,
    errors::ServiceError,
    services::{ledger, movement::MovementCommand},
};

async fn transaction_count(db: &sea_orm::DatabaseConnection) -> u64 {
    stock_transaction::Entity::find()
        .count(db)
        .await
        .expect("failed to count transactions")
}

#[tokio::test]
async fn move_transfers_quantity_and_appends_one_record() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-001", "Widget").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    let b2 = common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let user = common::create_user(&db, "jordan").await;
    common::create_position(&db, item.id, a1.id, 10).await;

    let record = movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "A1".to_string(),
                to_bin_code: "B2".to_string(),
                quantity: 5,
                notes: Some("rebalance".to_string()),
            },
            user.id,
        )
        .await
        .expect("movement should succeed");

    assert_eq!(record.transaction_type, "MOVEMENT");
    assert_eq!(record.quantity, 5);
    assert_eq!(record.from_bin_location_id, Some(a1.id));
    assert_eq!(record.to_bin_location_id, Some(b2.id));
    assert_eq!(record.user_id, user.id);

    assert_eq!(ledger::position_quantity(db.as_ref(), item.id, a1.id).await.unwrap(), 5);
    assert_eq!(ledger::position_quantity(db.as_ref(), item.id, b2.id).await.unwrap(), 5);
    assert_eq!(transaction_count(&db).await, 1);
}

#[tokio::test]
async fn move_creates_destination_position_on_first_write() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-002", "Widget II").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    let b2 = common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let user = common::create_user(&db, "jordan").await;
    common::create_position(&db, item.id, a1.id, 3).await;

    assert!(ledger::find_position(db.as_ref(), item.id, b2.id)
        .await
        .unwrap()
        .is_none());

    movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "A1".to_string(),
                to_bin_code: "B2".to_string(),
                quantity: 3,
                notes: None,
            },
            user.id,
        )
        .await
        .expect("movement should succeed");

    let destination = ledger::find_position(db.as_ref(), item.id, b2.id)
        .await
        .unwrap()
        .expect("destination position should exist");
    assert_eq!(destination.quantity, 3);

    // Drained source row persists at zero
    let source = ledger::find_position(db.as_ref(), item.id, a1.id)
        .await
        .unwrap()
        .expect("source position should persist");
    assert_eq!(source.quantity, 0);
}

#[tokio::test]
async fn move_with_insufficient_stock_changes_nothing() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-003", "Widget III").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let user = common::create_user(&db, "jordan").await;
    common::create_position(&db, item.id, a1.id, 5).await;

    let result = movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "A1".to_string(),
                to_bin_code: "B2".to_string(),
                quantity: 50,
                notes: None,
            },
            user.id,
        )
        .await;

    assert!(matches!(result, Err(ServiceError::InsufficientStock(_))));
    assert_eq!(ledger::position_quantity(db.as_ref(), item.id, a1.id).await.unwrap(), 5);
    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn move_to_same_bin_is_invalid_route() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-004", "Widget IV").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    let user = common::create_user(&db, "jordan").await;
    common::create_position(&db, item.id, a1.id, 10).await;

    let result = movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "A1".to_string(),
                to_bin_code: "A1".to_string(),
                quantity: 3,
                notes: Some("noop".to_string()),
            },
            user.id,
        )
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidRoute(_))));
    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn move_through_inactive_bin_is_invalid_route() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-005", "Widget V").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    common::create_bin(&db, "B9", "Seoul DC", "B", false).await;
    let user = common::create_user(&db, "jordan").await;
    common::create_position(&db, item.id, a1.id, 10).await;

    let result = movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "A1".to_string(),
                to_bin_code: "B9".to_string(),
                quantity: 2,
                notes: None,
            },
            user.id,
        )
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidRoute(_))));
    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn move_rejects_unknown_references() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-006", "Widget VI").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let user = common::create_user(&db, "jordan").await;

    // Unknown item
    let result = movement
        .record_movement(
            MovementCommand {
                item_id: 9999,
                from_bin_code: "A1".to_string(),
                to_bin_code: "B2".to_string(),
                quantity: 1,
                notes: None,
            },
            user.id,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    // Unknown source bin
    let result = movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "NOPE".to_string(),
                to_bin_code: "B2".to_string(),
                quantity: 1,
                notes: None,
            },
            user.id,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    // Known bins, but no stock position for the item at the source
    let result = movement
        .record_movement(
            MovementCommand {
                item_id: item.id,
                from_bin_code: "A1".to_string(),
                to_bin_code: "B2".to_string(),
                quantity: 1,
                notes: None,
            },
            user.id,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn move_rejects_non_positive_quantity() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-007", "Widget VII").await;
    common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let user = common::create_user(&db, "jordan").await;

    for quantity in [0, -5] {
        let result = movement
            .record_movement(
                MovementCommand {
                    item_id: item.id,
                    from_bin_code: "A1".to_string(),
                    to_bin_code: "B2".to_string(),
                    quantity,
                    notes: None,
                },
                user.id,
            )
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn movements_conserve_total_quantity_per_item() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "WIDGET-008", "Widget VIII").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    let b2 = common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let c3 = common::create_bin(&db, "C3", "Seoul DC", "C", true).await;
    let user = common::create_user(&db, "jordan").await;
    common::create_position(&db, item.id, a1.id, 12).await;

    for (from, to, quantity) in [("A1", "B2", 7), ("B2", "C3", 4), ("A1", "C3", 5)] {
        movement
            .record_movement(
                MovementCommand {
                    item_id: item.id,
                    from_bin_code: from.to_string(),
                    to_bin_code: to.to_string(),
                    quantity,
                    notes: None,
                },
                user.id,
            )
            .await
            .expect("movement should succeed");
    }

    let mut total = 0;
    for bin_id in [a1.id, b2.id, c3.id] {
        total += ledger::position_quantity(db.as_ref(), item.id, bin_id)
            .await
            .unwrap();
    }

    assert_eq!(total, 12);
    assert_eq!(transaction_count(&db).await, 3);
}
