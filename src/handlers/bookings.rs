use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus, TravelClass};
use crate::entities::travel_item::ItemKind;
use crate::error::AppResult;
use crate::services::bookings::{self as booking_service, BookingRequest, ContactInfo};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub item_id: Uuid,
    pub passengers: i32,
    pub selected_class: Option<TravelClass>,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
    pub reference: String,
    pub status: BookingStatus,
    pub total_price: f64,
}

/// Create a booking
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<CreateBookingResponse>> {
    let created = booking_service::create_booking(
        &*state.db,
        claims.sub,
        BookingRequest {
            item_kind: payload.kind,
            item_id: payload.item_id,
            passengers: payload.passengers,
            travel_class: payload.selected_class,
            contact: payload.contact_info,
        },
    )
    .await?;

    Ok(Json(CreateBookingResponse {
        booking_id: created.id,
        reference: created.reference,
        status: created.status,
        total_price: created.total_price,
    }))
}

/// List the logged-in user's bookings in the order they were made
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<booking::Model>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::UserId.eq(claims.sub))
        .order_by_asc(booking::Column::CreatedAt)
        .all(&*state.db)
        .await?;

    Ok(Json(bookings))
}

/// Cancel a booking, returning its seats to the travel item
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let cancelled = booking_service::cancel_booking(&*state.db, claims.sub, booking_id).await?;

    Ok(Json(serde_json::json!({
        "bookingId": cancelled.id,
        "status": cancelled.status,
    })))
}
