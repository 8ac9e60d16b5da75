//! Stay Request Model (入住申请)

use serde::{Deserialize, Serialize};

/// Stay request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Headcount breakdown; `total` is always recomputed server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleCount {
    pub male: i64,
    pub female: i64,
    pub children: i64,
    #[serde(default)]
    pub total: i64,
}

impl PeopleCount {
    /// Recompute the total from the breakdown
    pub fn with_total(mut self) -> Self {
        self.total = self.male + self.female + self.children;
        self
    }
}

/// Stay request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RoomRequest {
    pub id: i64,
    pub user_id: i64,
    /// Requester display name (denormalized at submit time)
    pub name: String,
    /// Name written on the paper form, if different
    #[serde(default)]
    pub form_name: String,
    pub place: String,
    pub purpose: String,
    /// Requested stay window (Unix millis)
    pub check_in_date: i64,
    pub check_out_date: i64,
    /// Headcount breakdown (JSON column)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub number_of_people: PeopleCount,
    #[serde(default)]
    pub special_requests: String,
    pub status: RequestStatus,
    pub processed_by: Option<i64>,
    pub processed_at: Option<i64>,
    /// Who referred the guest, free text
    #[serde(default)]
    pub reference: String,
    /// Shareable public code, `REQ-YYYYMMDD-XXXX`
    pub public_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Stay request joined with its guest and (if assigned) the room,
/// for the staff-facing read views. Lookups are best effort; a missing
/// piece comes back as `None` rather than failing the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRequestWithDetails {
    pub request: RoomRequest,
    pub user: Option<super::user::User>,
    pub assignment: Option<super::assignment::RoomAssignment>,
    pub room: Option<super::room::Room>,
}

/// Submit stay request payload
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct RoomRequestCreate {
    pub check_in_date: i64,
    pub check_out_date: i64,
    pub number_of_people: PeopleCount,
    #[serde(default)]
    pub form_name: String,
    #[validate(length(min = 1))]
    pub purpose: String,
    #[validate(length(min = 1))]
    pub place: String,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub reference: String,
}

/// Headcount edit payload (owner, while Pending)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeopleUpdate {
    pub number_of_people: PeopleCount,
}

/// Administrative edit payload (staff, bypasses owner/Pending gates)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomRequestAdminPatch {
    pub check_in_date: Option<i64>,
    pub check_out_date: Option<i64>,
    pub number_of_people: Option<PeopleCount>,
    pub form_name: Option<String>,
    pub purpose: Option<String>,
    pub place: Option<String>,
    pub special_requests: Option<String>,
    pub reference: Option<String>,
}

/// Process payload (approve/reject)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub status: RequestStatus,
    /// Room to assign on approval; optional (approval without a room is valid)
    pub room_id: Option<i64>,
}

/// List filter (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomRequestFilter {
    pub status: Option<RequestStatus>,
    pub user_id: Option<i64>,
}
