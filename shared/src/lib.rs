//! Shared types for the Sarai guest-accommodation backend
//!
//! Cross-cutting pieces used by the server (and any future tooling):
//!
//! - [`models`]: domain entities and their create/patch payloads
//! - [`error`]: unified error codes, [`error::AppError`], [`error::ApiResponse`]
//! - [`util`]: timestamps, snowflake IDs, public request codes

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
