//! Booking engine consistency tests
//!
//! Exercises the invariants the engine must hold under races: one winner per
//! slot, stock never overdrawn, all-or-nothing transactions.

use reserva_server::auth::{CurrentUser, Role};
use reserva_server::db::DbService;
use reserva_server::db::repository::{dining_table as table_repo, dish as dish_repo, zone as zone_repo};
use reserva_server::reservations::{
    CreateReservation, ReservationError, create_reservation, delete_reservation,
    find_available_tables, preorder_summary, update_reservation,
};
use shared::models::{
    DiningTableCreate, DishCreate, PreorderInput, ReservationStatus, ReservationUpdate, ZoneCreate,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = DbService::new(path.to_str().unwrap())
        .await
        .expect("failed to open test database");
    (dir, db.pool)
}

fn customer(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        display_name: format!("Customer {id}"),
        role: Role::Customer,
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: 1,
        display_name: "Admin".to_string(),
        role: Role::Admin,
    }
}

/// Seed one zone with one 4-seat table, returns the table id
async fn seed_table(pool: &SqlitePool) -> i64 {
    let zone = zone_repo::create(
        pool,
        ZoneCreate {
            name: "Terraza".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let table = table_repo::create(
        pool,
        DiningTableCreate {
            number: 1,
            capacity: 4,
            zone_id: Some(zone.id),
            status: None,
            pos_x: None,
            pos_y: None,
        },
    )
    .await
    .unwrap();
    table.id
}

async fn seed_dish(pool: &SqlitePool, name: &str, stock: i64) -> i64 {
    let dish = dish_repo::create(
        pool,
        DishCreate {
            name: name.to_string(),
            description: None,
            price: 12.5,
            category: Some("main".to_string()),
            stock_available: Some(stock),
            stock_max: Some(stock),
            is_available: Some(true),
        },
    )
    .await
    .unwrap();
    dish.id
}

fn booking(table_id: i64, time: &str, party_size: i64) -> CreateReservation {
    CreateReservation {
        table_id,
        date: "2026-09-01".to_string(),
        time: time.to_string(),
        party_size,
        notes: None,
        preorder_lines: vec![],
    }
}

async fn stock_of(pool: &SqlitePool, dish_id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock_available FROM dish WHERE id = ?")
        .bind(dish_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn reservation_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM reservation")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn concurrent_double_book_has_one_winner() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;

    let alice = customer(10);
    let bob = customer(11);
    let (a, b) = tokio::join!(
        create_reservation(&pool, &alice, booking(table_id, "19:00", 2)),
        create_reservation(&pool, &bob, booking(table_id, "19:00", 3)),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one booking must win the slot");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(
        loser.unwrap_err(),
        ReservationError::SlotAlreadyReserved { .. }
    ));
    assert_eq!(reservation_count(&pool).await, 1);
}

#[tokio::test]
async fn different_slots_do_not_conflict() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;

    create_reservation(&pool, &customer(10), booking(table_id, "19:00", 2))
        .await
        .unwrap();
    create_reservation(&pool, &customer(11), booking(table_id, "20:00", 2))
        .await
        .unwrap();

    assert_eq!(reservation_count(&pool).await, 2);
}

#[tokio::test]
async fn rejects_nonpositive_party_size() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;

    let err = create_reservation(&pool, &customer(10), booking(table_id, "19:00", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::InvalidInput(_)));
    assert_eq!(reservation_count(&pool).await, 0);
}

#[tokio::test]
async fn rejects_party_larger_than_capacity() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;

    let err = create_reservation(&pool, &customer(10), booking(table_id, "19:00", 9))
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::InvalidInput(_)));
    assert_eq!(reservation_count(&pool).await, 0);
}

#[tokio::test]
async fn cancellation_frees_the_slot() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;
    let user = customer(10);

    let reservation = create_reservation(&pool, &user, booking(table_id, "19:00", 2))
        .await
        .unwrap();

    // The slot is now taken
    let err = create_reservation(&pool, &customer(11), booking(table_id, "19:00", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::SlotAlreadyReserved { .. }));

    update_reservation(
        &pool,
        &user,
        reservation.id,
        ReservationUpdate {
            date: None,
            time: None,
            party_size: None,
            status: Some(ReservationStatus::Cancelled),
            notes: None,
        },
    )
    .await
    .unwrap();

    // Cancelled rows no longer block the partial unique index
    create_reservation(&pool, &customer(11), booking(table_id, "19:00", 2))
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_reservation_does_not_block() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;

    sqlx::query(
        "INSERT INTO reservation (table_id, customer_id, customer_name, date, time, party_size, status, created_at, updated_at) VALUES (?, 99, 'Walk-in', '2026-09-01', '19:00', 2, 'pending', 0, 0)",
    )
    .bind(table_id)
    .execute(&pool)
    .await
    .unwrap();

    // Availability still lists the table
    let tables = find_available_tables(&pool, "2026-09-01", "19:00", 2, None)
        .await
        .unwrap();
    assert!(tables.iter().any(|t| t.table_id == table_id));

    // And a confirmed booking can take the slot
    create_reservation(&pool, &customer(10), booking(table_id, "19:00", 2))
        .await
        .unwrap();
}

#[tokio::test]
async fn concurrent_preorders_never_overdraw_stock() {
    let (_dir, pool) = setup_db().await;
    let zone = zone_repo::create(
        &pool,
        ZoneCreate {
            name: "Sala".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let mut table_ids = Vec::new();
    for number in 1..=2 {
        let table = table_repo::create(
            &pool,
            DiningTableCreate {
                number,
                capacity: 4,
                zone_id: Some(zone.id),
                status: None,
                pos_x: None,
                pos_y: None,
            },
        )
        .await
        .unwrap();
        table_ids.push(table.id);
    }
    let dish_id = seed_dish(&pool, "Paella", 3).await;

    let order = |table_id| CreateReservation {
        table_id,
        date: "2026-09-01".to_string(),
        time: "19:00".to_string(),
        party_size: 2,
        notes: None,
        preorder_lines: vec![PreorderInput { dish_id, quantity: 2 }],
    };

    let alice = customer(10);
    let bob = customer(11);
    let (a, b) = tokio::join!(
        create_reservation(&pool, &alice, order(table_ids[0])),
        create_reservation(&pool, &bob, order(table_ids[1])),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "stock 3 can satisfy only one order of 2+2");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(
        loser.unwrap_err(),
        ReservationError::InsufficientStock { .. }
    ));

    // Loser's transaction rolled back whole: no reservation row, stock 3-2=1
    assert_eq!(reservation_count(&pool).await, 1);
    assert_eq!(stock_of(&pool, dish_id).await, 1);
}

#[tokio::test]
async fn insufficient_stock_aborts_whole_booking() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;
    let plenty = seed_dish(&pool, "Gazpacho", 10).await;
    let scarce = seed_dish(&pool, "Tarta", 1).await;

    let err = create_reservation(
        &pool,
        &customer(10),
        CreateReservation {
            table_id,
            date: "2026-09-01".to_string(),
            time: "19:00".to_string(),
            party_size: 2,
            notes: None,
            preorder_lines: vec![
                PreorderInput { dish_id: plenty, quantity: 2 },
                PreorderInput { dish_id: scarce, quantity: 2 },
            ],
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ReservationError::InsufficientStock { .. }));
    // Nothing persisted: no reservation, and the first decrement rolled back
    assert_eq!(reservation_count(&pool).await, 0);
    assert_eq!(stock_of(&pool, plenty).await, 10);
    assert_eq!(stock_of(&pool, scarce).await, 1);
}

#[tokio::test]
async fn cancellation_releases_preorder_stock_once() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;
    let dish_id = seed_dish(&pool, "Croquetas", 5).await;
    let user = customer(10);

    let reservation = create_reservation(
        &pool,
        &user,
        CreateReservation {
            table_id,
            date: "2026-09-01".to_string(),
            time: "19:00".to_string(),
            party_size: 2,
            notes: None,
            preorder_lines: vec![PreorderInput { dish_id, quantity: 3 }],
        },
    )
    .await
    .unwrap();
    assert_eq!(stock_of(&pool, dish_id).await, 2);

    let cancel = ReservationUpdate {
        date: None,
        time: None,
        party_size: None,
        status: Some(ReservationStatus::Cancelled),
        notes: None,
    };
    update_reservation(&pool, &user, reservation.id, cancel.clone())
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, dish_id).await, 5);

    // Cancelling again must not release a second time
    update_reservation(&pool, &user, reservation.id, cancel)
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, dish_id).await, 5);
}

#[tokio::test]
async fn delete_does_not_release_stock() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;
    let dish_id = seed_dish(&pool, "Pulpo", 5).await;
    let user = customer(10);

    let reservation = create_reservation(
        &pool,
        &user,
        CreateReservation {
            table_id,
            date: "2026-09-01".to_string(),
            time: "19:00".to_string(),
            party_size: 2,
            notes: None,
            preorder_lines: vec![PreorderInput { dish_id, quantity: 2 }],
        },
    )
    .await
    .unwrap();
    assert_eq!(stock_of(&pool, dish_id).await, 3);

    delete_reservation(&pool, &user, reservation.id)
        .await
        .unwrap();

    assert_eq!(reservation_count(&pool).await, 0);
    // Hard delete keeps the stock movement; cancellation is the release path
    assert_eq!(stock_of(&pool, dish_id).await, 3);
}

#[tokio::test]
async fn preorder_summary_totals_the_lines() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;
    let tortilla = seed_dish(&pool, "Tortilla", 10).await;
    let flan = seed_dish(&pool, "Flan", 10).await;

    let reservation = create_reservation(
        &pool,
        &customer(10),
        CreateReservation {
            table_id,
            date: "2026-09-01".to_string(),
            time: "19:00".to_string(),
            party_size: 2,
            notes: None,
            preorder_lines: vec![
                PreorderInput { dish_id: tortilla, quantity: 2 },
                PreorderInput { dish_id: flan, quantity: 3 },
            ],
        },
    )
    .await
    .unwrap();

    let summary = preorder_summary(&pool, reservation.id).await.unwrap();
    assert_eq!(summary.reservation_id, reservation.id);
    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.total_quantity, 5);
    // Both seeded dishes cost 12.50
    assert_eq!(summary.total_amount, 62.5);
    let flan_line = summary
        .lines
        .iter()
        .find(|l| l.dish_id == flan)
        .expect("flan line present");
    assert_eq!(flan_line.line_total, 37.5);

    let missing = preorder_summary(&pool, reservation.id + 100).await;
    assert!(matches!(
        missing.unwrap_err(),
        ReservationError::ReservationNotFound(_)
    ));
}

#[tokio::test]
async fn only_owner_or_admin_may_modify() {
    let (_dir, pool) = setup_db().await;
    let table_id = seed_table(&pool).await;
    let owner = customer(10);

    let reservation = create_reservation(&pool, &owner, booking(table_id, "19:00", 2))
        .await
        .unwrap();

    let stranger = customer(11);
    let err = delete_reservation(&pool, &stranger, reservation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Unauthorized(_)));

    // Admin may
    delete_reservation(&pool, &admin(), reservation.id)
        .await
        .unwrap();
}
