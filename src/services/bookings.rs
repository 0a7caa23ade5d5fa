//! Booking workflows: create, cancel, admin delete.
//!
//! Each workflow runs inside a single database transaction so the booking
//! row and the capacity adjustment land together or not at all. Capacity
//! itself is only touched through the guarded updates in [`crate::inventory`].

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus, TravelClass};
use crate::entities::travel_item::{self, ItemKind};
use crate::error::{AppError, AppResult};
use crate::utils::reference::booking_reference;
use crate::{inventory, pricing};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub passengers: i32,
    pub travel_class: Option<TravelClass>,
    pub contact: ContactInfo,
}

fn validate(request: &BookingRequest) -> AppResult<()> {
    if request.passengers < 1 {
        return Err(AppError::Validation(
            "passengers must be at least 1".to_string(),
        ));
    }

    let contact = &request.contact;
    for (value, field) in [
        (&contact.first_name, "firstName"),
        (&contact.last_name, "lastName"),
        (&contact.email, "email"),
        (&contact.phone, "phone"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "contact field '{}' is required",
                field
            )));
        }
    }

    if !contact.email.contains('@') {
        return Err(AppError::Validation(
            "contact email is not a valid address".to_string(),
        ));
    }

    Ok(())
}

/// Create a confirmed booking and take its seats out of the item's capacity.
///
/// The insert and the guarded decrement share one transaction: if the guard
/// fails the insert is rolled back, so a losing racer leaves no trace.
pub async fn create_booking(
    db: &DatabaseConnection,
    user_id: Uuid,
    request: BookingRequest,
) -> AppResult<booking::Model> {
    validate(&request)?;

    let txn = db.begin().await?;

    let item = travel_item::Entity::find_by_id(request.item_id)
        .filter(travel_item::Column::Kind.eq(request.item_kind))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", request.item_kind.as_str())))?;

    // Friendly rejection on the common path; the reserve guard below is the
    // authoritative check under concurrency.
    if request.passengers > item.capacity {
        return Err(AppError::InsufficientCapacity {
            requested: request.passengers,
            available: item.capacity,
        });
    }

    let travel_class = match request.item_kind {
        ItemKind::Trip => None,
        _ => request.travel_class,
    };
    let total_price = pricing::total_price(
        item.price,
        request.passengers,
        request.item_kind,
        travel_class,
    );

    let contact = request.contact;
    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        reference: Set(booking_reference(request.item_kind)),
        user_id: Set(user_id),
        item_kind: Set(request.item_kind),
        item_id: Set(item.id),
        passengers: Set(request.passengers),
        total_price: Set(total_price),
        status: Set(BookingStatus::Confirmed),
        travel_class: Set(travel_class),
        contact_first_name: Set(contact.first_name),
        contact_last_name: Set(contact.last_name),
        contact_email: Set(contact.email),
        contact_phone: Set(contact.phone),
        contact_address: Set(contact.address),
        contact_city: Set(contact.city),
        contact_country: Set(contact.country),
        contact_zip_code: Set(contact.zip_code),
        special_requests: Set(contact.special_requests),
        ..Default::default()
    };

    let created = new_booking.insert(&txn).await?;

    if !inventory::reserve(&txn, item.id, request.passengers).await? {
        // Lost the race since the read above; dropping the transaction
        // rolls the insert back.
        let available = travel_item::Entity::find_by_id(item.id)
            .one(&txn)
            .await?
            .map(|i| i.capacity)
            .unwrap_or(0);

        return Err(AppError::InsufficientCapacity {
            requested: request.passengers,
            available,
        });
    }

    txn.commit().await?;

    tracing::info!(
        booking_id = %created.id,
        reference = %created.reference,
        item_id = %created.item_id,
        passengers = created.passengers,
        "booking created"
    );

    Ok(created)
}

/// Flip a confirmed booking to cancelled and give its seats back.
///
/// Cancelled is terminal; cancelling twice fails with `AlreadyCancelled`.
/// A booking whose item was deleted cancels fine, the restore just finds
/// nothing to credit.
pub async fn cancel_booking(
    db: &DatabaseConnection,
    user_id: Uuid,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    let txn = db.begin().await?;

    let found = booking::Entity::find_by_id(booking_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if found.user_id != user_id {
        return Err(AppError::Forbidden(
            "You can only cancel your own bookings".to_string(),
        ));
    }

    match found.status {
        BookingStatus::Cancelled => return Err(AppError::AlreadyCancelled),
        BookingStatus::Pending => {
            return Err(AppError::Conflict(
                "Only confirmed bookings can be cancelled".to_string(),
            ));
        }
        BookingStatus::Confirmed => {}
    }

    // Guarded flip: the status predicate means only one of two concurrent
    // cancels moves the row out of confirmed, and only that one credits
    // the seats back.
    let flipped = booking::Entity::update_many()
        .col_expr(
            booking::Column::Status,
            Expr::value(BookingStatus::Cancelled),
        )
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
        .exec(&txn)
        .await?;

    if flipped.rows_affected == 0 {
        // A concurrent cancel won the race since the read above.
        return Err(AppError::AlreadyCancelled);
    }

    inventory::restore(&txn, found.item_id, found.passengers).await?;

    txn.commit().await?;

    tracing::info!(%booking_id, passengers = found.passengers, "booking cancelled");

    Ok(booking::Model {
        status: BookingStatus::Cancelled,
        ..found
    })
}

/// Hard-delete a booking and give its seats back.
///
/// Idempotent: a retry after the booking is gone returns `false` and credits
/// nothing, so a double delete cannot restore seats twice. Seats of already
/// cancelled bookings were credited at cancellation time and are skipped.
pub async fn admin_delete_booking(db: &DatabaseConnection, booking_id: Uuid) -> AppResult<bool> {
    let txn = db.begin().await?;

    let Some(found) = booking::Entity::find_by_id(booking_id).one(&txn).await? else {
        return Ok(false);
    };

    // Delete only the row in the status that was read. If a concurrent
    // cancel flipped it in between, that cancel owns the seat credit and
    // this delete backs off.
    let deleted = booking::Entity::delete_many()
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::Status.eq(found.status))
        .exec(&txn)
        .await?;

    if deleted.rows_affected == 0 {
        return Ok(false);
    }

    if found.status == BookingStatus::Confirmed {
        inventory::restore(&txn, found.item_id, found.passengers).await?;
    }

    txn.commit().await?;

    tracing::info!(%booking_id, "booking deleted by admin");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn contact() -> ContactInfo {
        ContactInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+4400000000".into(),
            address: None,
            city: None,
            country: None,
            zip_code: None,
            special_requests: None,
        }
    }

    fn request(passengers: i32) -> BookingRequest {
        BookingRequest {
            item_kind: ItemKind::Flight,
            item_id: Uuid::new_v4(),
            passengers,
            travel_class: Some(TravelClass::Economy),
            contact: contact(),
        }
    }

    fn flight(capacity: i32) -> travel_item::Model {
        travel_item::Model {
            id: Uuid::new_v4(),
            kind: ItemKind::Flight,
            origin: "Karachi".into(),
            destination: "Lahore".into(),
            name: None,
            description: None,
            carrier: Some("PIA".into()),
            service_number: Some("PK-303".into()),
            departure_at: Utc::now().into(),
            arrival_at: Utc::now().into(),
            price: 120.0,
            capacity,
            max_capacity: 120,
            featured: false,
            rating: None,
            image_url: None,
            created_at: Utc::now().into(),
        }
    }

    fn confirmed_booking(user_id: Uuid) -> booking::Model {
        booking::Model {
            id: Uuid::new_v4(),
            reference: "FLT-TESTREF1".into(),
            user_id,
            item_kind: ItemKind::Flight,
            item_id: Uuid::new_v4(),
            passengers: 2,
            total_price: 240.0,
            status: BookingStatus::Confirmed,
            travel_class: Some(TravelClass::Economy),
            contact_first_name: "Ada".into(),
            contact_last_name: "Lovelace".into(),
            contact_email: "ada@example.com".into(),
            contact_phone: "+4400000000".into(),
            contact_address: None,
            contact_city: None,
            contact_country: None,
            contact_zip_code: None,
            special_requests: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn rejects_non_positive_passenger_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_booking(&db, Uuid::new_v4(), request(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_missing_contact_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut req = request(1);
        req.contact.phone = "  ".into();
        let err = create_booking(&db, Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn booking_unknown_item_fails_with_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<travel_item::Model>::new()])
            .into_connection();

        let err = create_booking(&db, Uuid::new_v4(), request(2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn booking_more_than_capacity_fails_without_writes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight(2)]])
            .into_connection();

        let err = create_booking(&db, Uuid::new_v4(), request(4))
            .await
            .unwrap_err();

        match err {
            AppError::InsufficientCapacity {
                requested,
                available,
            } => {
                assert_eq!(requested, 4);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn losing_the_reserve_race_surfaces_insufficient_capacity() {
        let item = flight(5);
        let user_id = Uuid::new_v4();
        let mut created = confirmed_booking(user_id);
        created.item_id = item.id;
        created.passengers = 3;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // item fetch, insert RETURNING, post-race capacity re-read
            .append_query_results([vec![item.clone()]])
            .append_query_results([vec![created]])
            .append_query_results([vec![travel_item::Model {
                capacity: 1,
                ..item.clone()
            }]])
            // guarded decrement misses: a concurrent booking got there first
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let mut req = request(3);
        req.item_id = item.id;

        let err = create_booking(&db, user_id, req).await.unwrap_err();
        match err {
            AppError::InsufficientCapacity {
                requested,
                available,
            } => {
                assert_eq!(requested, 3);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn cancelling_twice_fails_with_already_cancelled() {
        let user_id = Uuid::new_v4();
        let mut cancelled = confirmed_booking(user_id);
        cancelled.status = BookingStatus::Cancelled;
        let booking_id = cancelled.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cancelled]])
            .into_connection();

        let err = cancel_booking(&db, user_id, booking_id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCancelled));
    }

    #[tokio::test]
    async fn cancelling_someone_elses_booking_is_forbidden() {
        let owner = Uuid::new_v4();
        let booking = confirmed_booking(owner);
        let booking_id = booking.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking]])
            .into_connection();

        let err = cancel_booking(&db, Uuid::new_v4(), booking_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn successful_booking_commits_insert_and_decrement() {
        let item = flight(10);
        let user_id = Uuid::new_v4();
        let mut created = confirmed_booking(user_id);
        created.item_id = item.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![item.clone()]])
            .append_query_results([vec![created]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let mut req = request(2);
        req.item_id = item.id;

        let booking = create_booking(&db, user_id, req).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        // Both writes of the pair must have been issued before the commit.
        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(log.contains(r#"INSERT INTO "booking""#));
        assert!(log.contains(r#"UPDATE "travel_item""#));
    }

    #[tokio::test]
    async fn successful_cancel_flips_status_and_restores_seats() {
        let user_id = Uuid::new_v4();
        let booking = confirmed_booking(user_id);
        let booking_id = booking.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking]])
            .append_exec_results([
                // guarded status flip
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                // capacity restore
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let cancelled = cancel_booking(&db, user_id, booking_id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(log.contains(r#"UPDATE "booking""#));
        assert!(log.contains(r#"UPDATE "travel_item""#));
        // The flip must carry the status predicate, not just the id.
        assert!(log.contains(r#""booking"."status""#));
    }

    #[tokio::test]
    async fn losing_the_cancel_race_surfaces_already_cancelled() {
        let user_id = Uuid::new_v4();
        let booking = confirmed_booking(user_id);
        let booking_id = booking.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking]])
            // the read saw confirmed, but a concurrent cancel flipped the
            // row first and the guarded update misses
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        // No restore exec result is queued: crediting seats after a lost
        // race would make the mock connection error out.
        let err = cancel_booking(&db, user_id, booking_id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCancelled));
    }

    #[tokio::test]
    async fn admin_delete_backs_off_when_the_row_changed() {
        let booking = confirmed_booking(Uuid::new_v4());
        let booking_id = booking.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking]])
            // guarded delete misses: a concurrent cancel moved the row out
            // of confirmed and owns the seat credit
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let deleted = admin_delete_booking(&db, booking_id).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn deleting_a_missing_booking_is_a_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<booking::Model>::new()])
            .into_connection();

        // No exec results are queued: any restore or delete attempt would
        // make the mock connection error out.
        let deleted = admin_delete_booking(&db, Uuid::new_v4()).await.unwrap();
        assert!(!deleted);
    }
}
