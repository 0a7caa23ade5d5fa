use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discriminant for the three bookable product shapes. Flights and buses
/// carry a carrier/service number, trips carry a name and description;
/// everything shares the same capacity and pricing columns.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[sea_orm(string_value = "flight")]
    Flight,
    #[sea_orm(string_value = "bus")]
    Bus,
    #[sea_orm(string_value = "trip")]
    Trip,
}

impl ItemKind {
    /// Parse the plural collection name used in route paths
    /// (`/api/items/flights` etc.).
    pub fn from_plural(s: &str) -> Option<Self> {
        match s {
            "flights" => Some(ItemKind::Flight),
            "buses" => Some(ItemKind::Bus),
            "trips" => Some(ItemKind::Trip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Flight => "flight",
            ItemKind::Bus => "bus",
            ItemKind::Trip => "trip",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "travel_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: ItemKind,
    pub origin: String,
    pub destination: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub carrier: Option<String>,
    pub service_number: Option<String>,
    pub departure_at: DateTimeWithTimeZone,
    pub arrival_at: DateTimeWithTimeZone,
    pub price: f64,
    /// Remaining bookable units. Kept within [0, max_capacity] by the
    /// guarded updates in the inventory module.
    pub capacity: i32,
    pub max_capacity: i32,
    pub featured: bool,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
