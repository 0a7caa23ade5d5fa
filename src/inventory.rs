//! Atomic capacity adjustments for travel items.
//!
//! Seat counts are the one piece of state contended by concurrent requests,
//! so they are only ever touched through guarded single-statement updates.
//! A plain read-modify-write here would lose updates under concurrency and
//! could drive capacity negative.

use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::travel_item;
use crate::error::AppResult;

/// Take `seats` out of an item's capacity, guarded so the decrement only
/// lands when enough seats remain:
///
/// `UPDATE travel_item SET capacity = capacity - n WHERE id = ? AND capacity >= n`
///
/// Returns `false` when the guard failed (not enough seats, or no such item).
pub async fn reserve<C: ConnectionTrait>(db: &C, item_id: Uuid, seats: i32) -> AppResult<bool> {
    let result = travel_item::Entity::update_many()
        .col_expr(
            travel_item::Column::Capacity,
            Expr::col(travel_item::Column::Capacity).sub(seats),
        )
        .filter(travel_item::Column::Id.eq(item_id))
        .filter(travel_item::Column::Capacity.gte(seats))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Give `seats` back, clamped so capacity never exceeds the item's maximum
/// (double-processing a restore must not mint seats):
///
/// `UPDATE travel_item SET capacity = CASE WHEN capacity + n <= max_capacity
/// THEN capacity + n ELSE max_capacity END WHERE id = ?`
///
/// Increment and clamp are one statement, so a concurrent decrement can
/// never land in between and get overwritten. A missing item is a no-op:
/// bookings may outlive the item they reference.
pub async fn restore<C: ConnectionTrait>(db: &C, item_id: Uuid, seats: i32) -> AppResult<()> {
    let result = travel_item::Entity::update_many()
        .col_expr(
            travel_item::Column::Capacity,
            Expr::case(
                Expr::col(travel_item::Column::Capacity)
                    .add(seats)
                    .lte(Expr::col(travel_item::Column::MaxCapacity)),
                Expr::col(travel_item::Column::Capacity).add(seats),
            )
            .finally(Expr::col(travel_item::Column::MaxCapacity))
            .into(),
        )
        .filter(travel_item::Column::Id.eq(item_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        tracing::debug!(%item_id, seats, "capacity restore skipped, item no longer exists");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn reserve_reports_guard_outcome() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let item_id = Uuid::new_v4();
        assert!(reserve(&db, item_id, 3).await.unwrap());
        assert!(!reserve(&db, item_id, 3).await.unwrap());
    }

    #[tokio::test]
    async fn restore_increments_and_clamps_in_one_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        restore(&db, Uuid::new_v4(), 5).await.unwrap();

        // One UPDATE carrying both the increment and the clamp; a second
        // statement would open a window for a concurrent decrement to be
        // overwritten.
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("CASE WHEN"));
    }

    #[tokio::test]
    async fn restore_is_a_noop_for_missing_items() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        // The update matches no row; this must not be an error.
        restore(&db, Uuid::new_v4(), 2).await.unwrap();
    }
}
