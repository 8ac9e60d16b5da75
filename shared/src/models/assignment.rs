//! Room Assignment Model (房间分配)

use serde::{Deserialize, Serialize};

/// Room assignment entity
///
/// Lifecycle is monotonic: created → checked in → checked out.
/// The two flags never reset once raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RoomAssignment {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub request_id: i64,
    /// Member names staying under this assignment (JSON column)
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub guest_names: Vec<String>,
    #[serde(default)]
    pub dining_hall_preference: String,
    /// Stay window (Unix millis)
    pub check_in_date: i64,
    pub check_out_date: i64,
    pub assigned_by: i64,
    pub assigned_at: i64,
    pub checked_in: bool,
    pub checked_in_at: Option<i64>,
    pub checked_out: bool,
    pub checked_out_at: Option<i64>,
}

/// Create assignment payload (direct assignment by staff)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    pub room_id: i64,
    pub user_id: i64,
    pub request_id: i64,
    pub check_in_date: i64,
    pub check_out_date: i64,
    #[serde(default)]
    pub guest_names: Vec<String>,
    #[serde(default)]
    pub dining_hall_preference: String,
}

/// Assignment joined with its guest, for the ledger enrichment views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentWithGuest {
    pub assignment: RoomAssignment,
    pub user: Option<super::user::User>,
}
