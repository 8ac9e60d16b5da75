//! User Model (guest/staff directory)
//!
//! Identity management lives in an external service; this backend only
//! reads the directory for role checks and ledger enrichment.

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    SuperAdmin,
    Staff,
    Guest,
}

impl Role {
    /// Staff-or-above check used by the manage routes
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Staff)
    }
}

/// Directory entry for a guest or staff member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// VIP flag set by the front office
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub phone_number: String,
    pub created_at: i64,
    pub updated_at: i64,
}
