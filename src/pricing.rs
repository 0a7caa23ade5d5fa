use crate::entities::booking::TravelClass;
use crate::entities::travel_item::ItemKind;

/// Class multiplier over the item's base price. Trips are priced flat and
/// ignore any class the client sends.
pub fn class_multiplier(kind: ItemKind, class: Option<TravelClass>) -> f64 {
    match (kind, class) {
        (ItemKind::Trip, _) => 1.0,
        (_, None) | (_, Some(TravelClass::Economy)) => 1.0,
        (ItemKind::Flight, Some(TravelClass::Business)) => 2.5,
        (ItemKind::Flight, Some(TravelClass::First)) => 4.0,
        (ItemKind::Bus, Some(TravelClass::Business)) => 2.0,
        (ItemKind::Bus, Some(TravelClass::First)) => 3.0,
    }
}

/// Total fare for a booking, rounded to cents.
pub fn total_price(
    base_price: f64,
    passengers: i32,
    kind: ItemKind,
    class: Option<TravelClass>,
) -> f64 {
    let raw = base_price * passengers as f64 * class_multiplier(kind, class);
    (raw * 100.0).round() / 100.0
}
