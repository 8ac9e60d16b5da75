//! Room Model (客房)

use serde::{Deserialize, Serialize};

/// Room type tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum RoomType {
    ShreeHariPlus,
    ShreeHari,
    SarjuPlus,
    Sarju,
    NeelkanthPlus,
    Neelkanth,
}

/// Bed type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BedType {
    Single,
    Double,
    ExtraBed,
}

/// A bed line item inside a room (stored as a JSON column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    #[serde(rename = "type")]
    pub bed_type: BedType,
    pub quantity: i64,
}

/// Room entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub floor: i64,
    pub room_type: RoomType,
    /// Bed inventory (JSON column)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub beds: Vec<Bed>,
    pub has_geyser: bool,
    pub has_ac: bool,
    pub has_sofa_set: bool,
    #[serde(default)]
    pub sofa_set_quantity: i64,
    #[serde(default)]
    pub extra_amenities: String,
    /// Hidden rooms are invisible to guests but remain assignable by staff
    pub is_visible: bool,
    pub is_occupied: bool,
    #[serde(default)]
    pub needs_cleaning: bool,
    #[serde(default)]
    pub building: String,
    /// Optional link to a room category (pricing/photos)
    pub room_category_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct RoomCreate {
    #[validate(length(min = 1))]
    pub room_number: String,
    pub floor: i64,
    pub room_type: RoomType,
    #[validate(length(min = 1))]
    pub beds: Vec<Bed>,
    #[serde(default)]
    pub has_geyser: bool,
    #[serde(default)]
    pub has_ac: bool,
    #[serde(default)]
    pub has_sofa_set: bool,
    #[serde(default)]
    pub sofa_set_quantity: i64,
    pub room_category_id: Option<i64>,
    #[serde(default)]
    pub extra_amenities: String,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub building: String,
}

/// Update room payload
///
/// Only the listed fields can be patched; building is fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomPatch {
    pub room_number: Option<String>,
    pub floor: Option<i64>,
    pub room_type: Option<RoomType>,
    pub beds: Option<Vec<Bed>>,
    pub has_geyser: Option<bool>,
    pub has_ac: Option<bool>,
    pub has_sofa_set: Option<bool>,
    pub sofa_set_quantity: Option<i64>,
    pub extra_amenities: Option<String>,
    pub is_visible: Option<bool>,
    pub needs_cleaning: Option<bool>,
    pub room_category_id: Option<i64>,
}

/// List filter (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub floor: Option<i64>,
    pub room_type: Option<RoomType>,
    pub building: Option<String>,
    pub is_visible: Option<bool>,
    pub is_occupied: Option<bool>,
}

/// Aggregate room counts, computed at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStats {
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub available_rooms: i64,
}
