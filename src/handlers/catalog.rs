use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::travel_item::{self, ItemKind};
use crate::error::{AppError, AppResult};
use crate::AppState;

fn parse_kind(kind: &str) -> AppResult<ItemKind> {
    ItemKind::from_plural(kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown travel category '{}'", kind)))
}

/// List all items of one kind, soonest departure first
pub async fn list_items(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<travel_item::Model>>> {
    let kind = parse_kind(&kind)?;

    let items = travel_item::Entity::find()
        .filter(travel_item::Column::Kind.eq(kind))
        .order_by_asc(travel_item::Column::DepartureAt)
        .all(&*state.db)
        .await?;

    Ok(Json(items))
}

/// Get a single item by id
pub async fn get_item(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> AppResult<Json<travel_item::Model>> {
    let kind = parse_kind(&kind)?;

    let item = travel_item::Entity::find_by_id(id)
        .filter(travel_item::Column::Kind.eq(kind))
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.as_str())))?;

    Ok(Json(item))
}
