//! Unified error codes for the Sarai backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Room errors
//! - 4xxx: Stay request errors
//! - 5xxx: Room assignment errors
//! - 6xxx: Meal pass errors
//! - 7xxx: Catalog errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Caller does not own the resource
    NotResourceOwner = 2003,

    // ==================== 3xxx: Room ====================
    /// Room not found
    RoomNotFound = 3001,
    /// Room number already exists in the building
    RoomNumberExists = 3002,
    /// Room is currently occupied
    RoomOccupied = 3003,
    /// Room is referenced by an active assignment
    RoomHasActiveAssignment = 3004,

    // ==================== 4xxx: Stay request ====================
    /// Stay request not found
    RequestNotFound = 4001,
    /// Stay request is no longer pending
    RequestNotPending = 4002,
    /// Stay request has already been processed
    RequestAlreadyProcessed = 4003,

    // ==================== 5xxx: Assignment ====================
    /// Room assignment not found
    AssignmentNotFound = 5001,
    /// Assignment has already been checked in
    AlreadyCheckedIn = 5002,
    /// Assignment has not been checked in yet
    NotCheckedIn = 5003,
    /// Assignment has already been checked out
    AlreadyCheckedOut = 5004,

    // ==================== 6xxx: Meal pass ====================
    /// Pass cannot be redeemed (missing, used, or expired — deliberately opaque)
    PassNotRedeemable = 6001,
    /// Meal pass not found
    PassNotFound = 6002,
    /// Dining hall category not found
    DiningHallNotFound = 6101,
    /// Color code is not a valid hex value
    InvalidColorCode = 6102,

    // ==================== 7xxx: Catalog ====================
    /// Room category not found
    CategoryNotFound = 7001,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::NotResourceOwner => "Caller does not own this resource",

            // Room
            ErrorCode::RoomNotFound => "Room not found",
            ErrorCode::RoomNumberExists => "Room number already exists in this building",
            ErrorCode::RoomOccupied => "Room is currently occupied",
            ErrorCode::RoomHasActiveAssignment => "Room has an active assignment",

            // Stay request
            ErrorCode::RequestNotFound => "Stay request not found",
            ErrorCode::RequestNotPending => "Stay request is no longer pending",
            ErrorCode::RequestAlreadyProcessed => "Stay request has already been processed",

            // Assignment
            ErrorCode::AssignmentNotFound => "Room assignment not found",
            ErrorCode::AlreadyCheckedIn => "Assignment has already been checked in",
            ErrorCode::NotCheckedIn => "Assignment has not been checked in",
            ErrorCode::AlreadyCheckedOut => "Assignment has already been checked out",

            // Meal pass
            ErrorCode::PassNotRedeemable => "Pass not found, already used, or expired",
            ErrorCode::PassNotFound => "Meal pass not found",
            ErrorCode::DiningHallNotFound => "Dining hall category not found",
            ErrorCode::InvalidColorCode => "Color code must be a hex value like #FF5733",

            // Catalog
            ErrorCode::CategoryNotFound => "Room category not found",

            // User
            ErrorCode::UserNotFound => "User not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::NotResourceOwner),

            // Room
            3001 => Ok(ErrorCode::RoomNotFound),
            3002 => Ok(ErrorCode::RoomNumberExists),
            3003 => Ok(ErrorCode::RoomOccupied),
            3004 => Ok(ErrorCode::RoomHasActiveAssignment),

            // Stay request
            4001 => Ok(ErrorCode::RequestNotFound),
            4002 => Ok(ErrorCode::RequestNotPending),
            4003 => Ok(ErrorCode::RequestAlreadyProcessed),

            // Assignment
            5001 => Ok(ErrorCode::AssignmentNotFound),
            5002 => Ok(ErrorCode::AlreadyCheckedIn),
            5003 => Ok(ErrorCode::NotCheckedIn),
            5004 => Ok(ErrorCode::AlreadyCheckedOut),

            // Meal pass
            6001 => Ok(ErrorCode::PassNotRedeemable),
            6002 => Ok(ErrorCode::PassNotFound),
            6101 => Ok(ErrorCode::DiningHallNotFound),
            6102 => Ok(ErrorCode::InvalidColorCode),

            // Catalog
            7001 => Ok(ErrorCode::CategoryNotFound),

            // User
            8001 => Ok(ErrorCode::UserNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.message())
    }
}
