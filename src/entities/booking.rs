use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::travel_item::ItemKind;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// Cabin class for flights and buses. Trips are priced flat and carry no
/// class at all.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TravelClass {
    #[sea_orm(string_value = "economy")]
    #[serde(rename = "Economy")]
    Economy,
    #[sea_orm(string_value = "business")]
    #[serde(rename = "Business")]
    Business,
    #[sea_orm(string_value = "first")]
    #[serde(rename = "First Class")]
    First,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-facing reference code, e.g. `FLT-7K2M9QX4`.
    #[sea_orm(unique)]
    pub reference: String,
    pub user_id: Uuid,
    pub item_kind: ItemKind,
    /// Deliberately not a foreign key: the referenced travel item may be
    /// deleted by an admin while the booking record lives on.
    pub item_id: Uuid,
    pub passengers: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub travel_class: Option<TravelClass>,
    pub contact_first_name: String,
    pub contact_last_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_address: Option<String>,
    pub contact_city: Option<String>,
    pub contact_country: Option<String>,
    pub contact_zip_code: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
