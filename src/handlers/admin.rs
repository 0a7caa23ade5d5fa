use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::travel_item::{self, ItemKind};
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::inventory;
use crate::services::bookings as booking_service;
use crate::AppState;

// ============ Travel Item Management ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub kind: ItemKind,
    pub origin: String,
    pub destination: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub carrier: Option<String>,
    pub service_number: Option<String>,
    pub departure_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub price: f64,
    pub capacity: i32,
    pub featured: Option<bool>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub carrier: Option<String>,
    pub service_number: Option<String>,
    pub departure_at: Option<DateTime<Utc>>,
    pub arrival_at: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub max_capacity: Option<i32>,
    pub featured: Option<bool>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

/// Create a travel item (admin)
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> AppResult<Json<travel_item::Model>> {
    if payload.price < 0.0 {
        return Err(AppError::Validation("Price cannot be negative".to_string()));
    }
    if payload.capacity < 0 {
        return Err(AppError::Validation(
            "Capacity cannot be negative".to_string(),
        ));
    }
    if payload.arrival_at <= payload.departure_at {
        return Err(AppError::Validation(
            "Arrival must be after departure".to_string(),
        ));
    }
    match payload.kind {
        ItemKind::Flight | ItemKind::Bus => {
            if payload.carrier.as_deref().unwrap_or("").trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "A carrier is required for a {}",
                    payload.kind.as_str()
                )));
            }
        }
        ItemKind::Trip => {
            if payload.name.as_deref().unwrap_or("").trim().is_empty() {
                return Err(AppError::Validation(
                    "A name is required for a trip".to_string(),
                ));
            }
        }
    }

    let item = travel_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(payload.kind),
        origin: Set(payload.origin),
        destination: Set(payload.destination),
        name: Set(payload.name),
        description: Set(payload.description),
        carrier: Set(payload.carrier),
        service_number: Set(payload.service_number),
        departure_at: Set(payload.departure_at.into()),
        arrival_at: Set(payload.arrival_at.into()),
        price: Set(payload.price),
        capacity: Set(payload.capacity),
        max_capacity: Set(payload.capacity),
        featured: Set(payload.featured.unwrap_or(false)),
        rating: Set(payload.rating),
        image_url: Set(payload.image_url),
        ..Default::default()
    };

    let result = item.insert(&*state.db).await?;
    Ok(Json(result))
}

/// Update a travel item (admin)
///
/// Runs under a row lock so a max-capacity change cannot interleave with a
/// concurrent booking's guarded decrement on the same row.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<travel_item::Model>> {
    let txn = state.db.begin().await?;

    let item = travel_item::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Travel item not found".to_string()))?;

    let (capacity, max_capacity) = (item.capacity, item.max_capacity);
    let mut active: travel_item::ActiveModel = item.into();

    if let Some(origin) = payload.origin {
        active.origin = Set(origin);
    }
    if let Some(destination) = payload.destination {
        active.destination = Set(destination);
    }
    if let Some(name) = payload.name {
        active.name = Set(Some(name));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(carrier) = payload.carrier {
        active.carrier = Set(Some(carrier));
    }
    if let Some(service_number) = payload.service_number {
        active.service_number = Set(Some(service_number));
    }
    if let Some(departure_at) = payload.departure_at {
        active.departure_at = Set(departure_at.into());
    }
    if let Some(arrival_at) = payload.arrival_at {
        active.arrival_at = Set(arrival_at.into());
    }
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".to_string()));
        }
        active.price = Set(price);
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(Some(rating));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }

    if let Some(new_max) = payload.max_capacity {
        if new_max < 0 {
            return Err(AppError::Validation(
                "Capacity cannot be negative".to_string(),
            ));
        }
        // Extra seats go straight on sale; a shrink clamps what is left.
        let delta = new_max - max_capacity;
        active.max_capacity = Set(new_max);
        active.capacity = Set((capacity + delta).clamp(0, new_max));
    }

    let result = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(result))
}

/// Delete a travel item (admin). Bookings referencing it survive as
/// dangling references.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = travel_item::Entity::delete_by_id(id)
        .exec(&*state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Travel item not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Travel item deleted" })))
}

// ============ User Management ============

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// List all users (admin)
pub async fn list_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::Entity::find().all(&*state.db).await?;

    let responses: Vec<UserResponse> = users
        .into_iter()
        .map(|u| UserResponse {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            created_at: u.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}

/// Delete a user account (admin). Seats held by the user's confirmed
/// bookings go back on sale before the cascade removes the bookings.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let txn = state.db.begin().await?;

    user::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let confirmed = booking::Entity::find()
        .filter(booking::Column::UserId.eq(id))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
        .all(&txn)
        .await?;

    for b in &confirmed {
        // Guarded delete per booking: a concurrent cancel credits the
        // seats itself, in which case this row is skipped.
        let removed = booking::Entity::delete_many()
            .filter(booking::Column::Id.eq(b.id))
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
            .exec(&txn)
            .await?;

        if removed.rows_affected == 1 {
            inventory::restore(&txn, b.item_id, b.passengers).await?;
        }
    }

    user::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

// ============ Booking Management ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingInfo {
    pub id: Uuid,
    pub reference: String,
    pub user_name: String,
    pub user_email: String,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub passengers: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// List every booking across all users, newest first (admin)
pub async fn list_all_bookings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AdminBookingInfo>>> {
    let bookings = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .all(&*state.db)
        .await?;
    let users = user::Entity::find().all(&*state.db).await?;

    let responses: Vec<AdminBookingInfo> = bookings
        .into_iter()
        .map(|b| {
            let user = users.iter().find(|u| u.id == b.user_id);
            AdminBookingInfo {
                id: b.id,
                reference: b.reference,
                user_name: user.map(|u| u.name.clone()).unwrap_or_default(),
                user_email: user.map(|u| u.email.clone()).unwrap_or_default(),
                item_kind: b.item_kind,
                item_id: b.item_id,
                passengers: b.passengers,
                total_price: b.total_price,
                status: b.status,
                created_at: b.created_at.with_timezone(&Utc),
            }
        })
        .collect();

    Ok(Json(responses))
}

/// Delete any booking and put its seats back on sale (admin).
/// Deleting an id that is already gone is a no-op, not an error.
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = booking_service::admin_delete_booking(&*state.db, booking_id).await?;

    let message = if deleted {
        "Booking deleted"
    } else {
        "Booking already removed"
    };

    Ok(Json(serde_json::json!({ "message": message })))
}
