pub mod booking;
pub mod travel_item;
pub mod user;
