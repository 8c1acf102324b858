mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use stockledger_api::{
    entities::stock_transaction,
    errors::ServiceError,
    services::{adjustment::AdjustmentCommand, ledger, movement::MovementCommand},
};

// Twenty writers racing to take one unit each from a ten-unit position:
// exactly ten may win, the quantity may never be observed negative, and each
// winner leaves exactly one ADJUSTMENT record.
#[tokio::test]
async fn concurrent_adjustments_never_drive_quantity_negative() {
    let db = common::setup_db().await;
    let (_movement, adjustment, _rx) = common::setup_services(db.clone());

    let item = common::create_item(&db, "RACE-001", "Race Widget").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    let user = common::create_user(&db, "riley").await;
    let position = common::create_position(&db, item.id, a1.id, 10).await;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let adjustment = adjustment.clone();
        let position_id = position.id;
        let user_id = user.id;
        tasks.push(tokio::spawn(async move {
            adjustment
                .record_adjustment(
                    AdjustmentCommand {
                        inventory_position_id: position_id,
                        adjustment_quantity: -1,
                        notes: "picked".to_string(),
                    },
                    user_id,
                )
                .await
        }));
    }

    let mut successes = 0;
    let mut insufficient = 0;
    for task in tasks {
        match task.await.expect("task should not panic") {
            Ok(_) => successes += 1,
            Err(ServiceError::InsufficientStock(_)) => insufficient += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 10, "exactly ten decrements may win");
    assert_eq!(insufficient, 10);

    let quantity = ledger::position_quantity(db.as_ref(), item.id, a1.id)
        .await
        .unwrap();
    assert_eq!(quantity, 0);

    let records = stock_transaction::Entity::find()
        .filter(stock_transaction::Column::TransactionType.eq("ADJUSTMENT"))
        .count(db.as_ref())
        .await
        .unwrap();
    assert_eq!(records, 10, "one record per successful adjustment");
}

// Movements on disjoint positions proceed independently; the per-item
// conservation law holds across both items afterwards.
#[tokio::test]
async fn concurrent_movements_on_disjoint_positions_all_commit() {
    let db = common::setup_db().await;
    let (movement, _adjustment, _rx) = common::setup_services(db.clone());

    let left = common::create_item(&db, "LEFT-001", "Left Part").await;
    let right = common::create_item(&db, "RIGHT-001", "Right Part").await;
    let a1 = common::create_bin(&db, "A1", "Seoul DC", "A", true).await;
    let b2 = common::create_bin(&db, "B2", "Seoul DC", "B", true).await;
    let user = common::create_user(&db, "riley").await;
    common::create_position(&db, left.id, a1.id, 8).await;
    common::create_position(&db, right.id, a1.id, 8).await;

    let mut tasks = Vec::new();
    for item_id in [left.id, right.id] {
        for _ in 0..4 {
            let movement = movement.clone();
            let user_id = user.id;
            tasks.push(tokio::spawn(async move {
                movement
                    .record_movement(
                        MovementCommand {
                            item_id,
                            from_bin_code: "A1".to_string(),
                            to_bin_code: "B2".to_string(),
                            quantity: 2,
                            notes: None,
                        },
                        user_id,
                    )
                    .await
            }));
        }
    }

    for task in tasks {
        task.await
            .expect("task should not panic")
            .expect("disjoint movements should all commit");
    }

    for item_id in [left.id, right.id] {
        let at_source = ledger::position_quantity(db.as_ref(), item_id, a1.id)
            .await
            .unwrap();
        let at_destination = ledger::position_quantity(db.as_ref(), item_id, b2.id)
            .await
            .unwrap();
        assert_eq!(at_source, 0);
        assert_eq!(at_destination, 8);
        assert_eq!(at_source + at_destination, 8);
    }
}
