//! Service Layer
//!
//! Cross-repository orchestration that handlers stay out of: room
//! claim/release around the assignment ledger, and meal pass batches
//! derived from stay windows.

pub mod assignment;
pub mod food_pass;
