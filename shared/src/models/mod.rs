//! Data models
//!
//! Shared between sarai-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod assignment;
pub mod category;
pub mod food_pass;
pub mod room;
pub mod room_request;
pub mod user;

// Re-exports
pub use assignment::*;
pub use category::*;
pub use food_pass::*;
pub use room::*;
pub use room_request::*;
pub use user::*;
