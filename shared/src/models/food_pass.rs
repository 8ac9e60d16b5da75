//! Meal Pass Model (餐券)

use serde::{Deserialize, Serialize};

/// Meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All meal slots, in serving order
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];
}

/// Meal pass entity
///
/// The pass `id` doubles as the scannable token; `date` is a calendar
/// day (`YYYY-MM-DD`), not an instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FoodPass {
    pub id: i64,
    /// Owning guest account
    pub user_id: i64,
    /// Family member this pass is for
    pub member_name: String,
    pub meal_type: MealType,
    /// Valid-on day, `YYYY-MM-DD`
    pub date: String,
    pub is_used: bool,
    pub used_at: Option<i64>,
    #[serde(default)]
    pub dining_hall: String,
    /// Display color resolved from the dining hall at issuance
    #[serde(default)]
    pub color_code: String,
    pub created_by: i64,
    pub created_at: i64,
}

/// Batch issuance payload
///
/// One pass per (member, meal, day) over the inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct FoodPassGenerate {
    pub user_id: i64,
    #[validate(length(min = 1))]
    pub member_names: Vec<String>,
    /// `YYYY-MM-DD`, inclusive
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: String,
    #[serde(default)]
    pub dining_hall: String,
}

/// Scan/redeem payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodPassScan {
    pub pass_id: i64,
}

/// Staff correction payload for a single pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodPassPatch {
    pub member_name: Option<String>,
    pub meal_type: Option<MealType>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub is_used: Option<bool>,
    pub dining_hall: Option<String>,
    pub color_code: Option<String>,
}

/// List filter (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodPassFilter {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub is_used: Option<bool>,
}
