//! Catalog Models: room categories and dining halls

use serde::{Deserialize, Serialize};

/// A photo attached to a room category (stored inside a JSON column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomImage {
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub uploaded_at: i64,
}

/// Room category: a marketable tier with price and photos
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RoomCategory {
    pub id: i64,
    pub room_name: String,
    /// Display price, free-form text (e.g. "₹1200/night")
    pub price: String,
    /// Photos (JSON column)
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub images: Vec<RoomImage>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create room category payload
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct RoomCategoryCreate {
    #[validate(length(min = 1))]
    pub room_name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub images: Vec<RoomImage>,
}

/// Update room category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomCategoryPatch {
    pub room_name: Option<String>,
    pub price: Option<String>,
    pub images: Option<Vec<RoomImage>>,
}

/// Dining hall category: maps a dining building to its pass color
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningHallCategory {
    pub id: i64,
    pub building_name: String,
    /// Hex color, `#RRGGBB`
    pub color_code: String,
    pub created_at: i64,
}

/// Create dining hall payload
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct DiningHallCreate {
    #[validate(length(min = 1))]
    pub building_name: String,
    pub color_code: String,
}

/// Update dining hall payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningHallPatch {
    pub building_name: Option<String>,
    pub color_code: Option<String>,
}

/// Validate a `#RRGGBB` (or `#RGB`) hex color code
pub fn is_valid_color_code(code: &str) -> bool {
    let Some(hex) = code.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
