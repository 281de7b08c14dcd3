//! Stock ledger and report projection tests

use reserva_server::auth::{CurrentUser, Role};
use reserva_server::db::DbService;
use reserva_server::db::repository::{dining_table as table_repo, dish as dish_repo, zone as zone_repo};
use reserva_server::reports;
use reserva_server::reservations::{CreateReservation, ReservationError, create_reservation};
use reserva_server::stock::{StockAdjustMode, adjust_stock, get_available_menu};
use shared::models::{DiningTableCreate, DishCreate, ZoneCreate};
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

async fn seed_dish(pool: &SqlitePool, name: &str, stock: i64, available: bool) -> i64 {
    let dish = dish_repo::create(
        pool,
        DishCreate {
            name: name.to_string(),
            description: None,
            price: 9.0,
            category: Some("starter".to_string()),
            stock_available: Some(stock),
            stock_max: Some(stock),
            is_available: Some(available),
        },
    )
    .await
    .unwrap();
    dish.id
}

#[tokio::test]
async fn adjust_stock_guards_against_overdraw() {
    let (_dir, pool) = setup_db().await;
    let dish_id = seed_dish(&pool, "Jamón", 5, true).await;

    let level = adjust_stock(&pool, dish_id, 3, StockAdjustMode::Decrement)
        .await
        .unwrap();
    assert_eq!(level, 2);

    let err = adjust_stock(&pool, dish_id, 3, StockAdjustMode::Decrement)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReservationError::InsufficientStock { available: 2, requested: 3, .. }
    ));

    // Restock is unconditional, stock_max is advisory
    let level = adjust_stock(&pool, dish_id, 10, StockAdjustMode::Increment)
        .await
        .unwrap();
    assert_eq!(level, 12);
}

#[tokio::test]
async fn adjust_stock_unknown_dish() {
    let (_dir, pool) = setup_db().await;
    let err = adjust_stock(&pool, 404, 1, StockAdjustMode::Decrement)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::DishNotFound(404)));
}

#[tokio::test]
async fn menu_hides_unavailable_and_out_of_stock() {
    let (_dir, pool) = setup_db().await;
    let listed = seed_dish(&pool, "Tortilla", 4, true).await;
    seed_dish(&pool, "Fuera de carta", 4, false).await;
    seed_dish(&pool, "Agotado", 0, true).await;

    let menu = get_available_menu(&pool).await.unwrap();
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0].id, listed);
}

#[tokio::test]
async fn period_report_aggregates_per_day() {
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

    let user = CurrentUser {
        id: 10,
        display_name: "Customer 10".to_string(),
        role: Role::Customer,
    };
    for (table_id, date, time) in [
        (table_ids[0], "2026-09-01", "19:00"),
        (table_ids[1], "2026-09-01", "20:00"),
        (table_ids[0], "2026-09-02", "19:00"),
    ] {
        create_reservation(
            &pool,
            &user,
            CreateReservation {
                table_id,
                date: date.to_string(),
                time: time.to_string(),
                party_size: 4,
                notes: None,
                preorder_lines: vec![],
            },
        )
        .await
        .unwrap();
    }

    let rows = reports::period_report(&pool, "2026-09-01", "2026-09-02")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2026-09-01");
    assert_eq!(rows[0].total_reservations, 2);
    assert_eq!(rows[0].confirmed_reservations, 2);
    assert_eq!(rows[0].total_guests, 8);
    assert_eq!(rows[1].date, "2026-09-02");
    assert_eq!(rows[1].total_reservations, 1);

    // Inverted range is a validation error, not an empty result
    let err = reports::period_report(&pool, "2026-09-02", "2026-09-01")
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::InvalidInput(_)));
}

#[tokio::test]
async fn dashboard_counts_tables_and_reservations() {
    let (_dir, pool) = setup_db().await;
    let zone = zone_repo::create(
        &pool,
        ZoneCreate {
            name: "Terraza".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let table = table_repo::create(
        &pool,
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

    let user = CurrentUser {
        id: 10,
        display_name: "Customer 10".to_string(),
        role: Role::Customer,
    };
    create_reservation(
        &pool,
        &user,
        CreateReservation {
            table_id: table.id,
            date: "2026-09-01".to_string(),
            time: "19:00".to_string(),
            party_size: 3,
            notes: None,
            preorder_lines: vec![],
        },
    )
    .await
    .unwrap();

    let stats = reports::dashboard(&pool).await.unwrap();
    assert_eq!(stats.total_reservations, 1);
    assert_eq!(stats.confirmed_reservations, 1);
    assert_eq!(stats.cancelled_reservations, 0);
    assert_eq!(stats.total_guests, 3);
    assert_eq!(stats.total_tables, 1);
    // Booking flips the floor-plan flag
    assert_eq!(stats.reserved_tables, 1);
    assert_eq!(stats.available_tables, 0);
}
