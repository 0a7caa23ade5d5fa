use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entities::travel_item::{self, ItemKind};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    /// Restrict to one collection: `flights`, `buses` or `trips`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<NaiveDate>,
    pub departure_city: Option<String>,
    pub destination_city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub flights: Vec<travel_item::Model>,
    pub buses: Vec<travel_item::Model>,
    pub trips: Vec<travel_item::Model>,
}

fn contains(col: travel_item::Column, needle: &str) -> SimpleExpr {
    Expr::col(col).ilike(format!("%{}%", needle.trim()))
}

/// Build the filter for one item kind out of the request parameters.
fn kind_condition(kind: ItemKind, params: &SearchParams) -> Condition {
    use travel_item::Column;

    let mut cond = Condition::all().add(Column::Kind.eq(kind));

    if let (Some(dep), Some(dest)) = (&params.departure_city, &params.destination_city) {
        // Both endpoints given: require the pair to match.
        cond = cond
            .add(contains(Column::Origin, dep))
            .add(contains(Column::Destination, dest));
    } else {
        let mut text = Condition::any();
        let mut has_text = false;

        if let Some(q) = params.query.as_deref().filter(|q| !q.trim().is_empty()) {
            text = text
                .add(contains(Column::Origin, q))
                .add(contains(Column::Destination, q));
            match kind {
                ItemKind::Trip => {
                    text = text
                        .add(contains(Column::Name, q))
                        .add(contains(Column::Description, q));
                }
                ItemKind::Flight | ItemKind::Bus => {
                    text = text.add(contains(Column::Carrier, q));
                }
            }
            has_text = true;
        }
        if let Some(dep) = &params.departure_city {
            text = text.add(contains(Column::Origin, dep));
            has_text = true;
        }
        if let Some(dest) = &params.destination_city {
            text = text.add(contains(Column::Destination, dest));
            has_text = true;
        }

        if has_text {
            cond = cond.add(text);
        }
    }

    if let Some(date) = params.date {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        match kind {
            // A trip matches when the chosen day falls inside its date range.
            ItemKind::Trip => {
                cond = cond
                    .add(Column::DepartureAt.lte(day_start))
                    .add(Column::ArrivalAt.gte(day_start));
            }
            // Flights and buses match on same-day departure.
            ItemKind::Flight | ItemKind::Bus => {
                let day_end = day_start + Duration::days(1);
                cond = cond
                    .add(Column::DepartureAt.gte(day_start))
                    .add(Column::DepartureAt.lt(day_end));
            }
        }
    }

    cond
}

/// Search flights, buses and trips
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResults>> {
    if params.query.is_none()
        && params.date.is_none()
        && params.departure_city.is_none()
        && params.destination_city.is_none()
    {
        return Err(AppError::BadRequest(
            "Search query, date, or city is required".to_string(),
        ));
    }

    let kinds: Vec<ItemKind> = match params.kind.as_deref() {
        Some(k) => vec![ItemKind::from_plural(k).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown travel category '{}'", k))
        })?],
        None => vec![ItemKind::Flight, ItemKind::Bus, ItemKind::Trip],
    };

    let mut results = SearchResults {
        flights: Vec::new(),
        buses: Vec::new(),
        trips: Vec::new(),
    };

    for kind in kinds {
        let items = travel_item::Entity::find()
            .filter(kind_condition(kind, &params))
            .all(&*state.db)
            .await?;

        match kind {
            ItemKind::Flight => results.flights = items,
            ItemKind::Bus => results.buses = items,
            ItemKind::Trip => results.trips = items,
        }
    }

    Ok(Json(results))
}
