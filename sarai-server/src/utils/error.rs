//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，此处统一 re-export 并提供
//! handler 层的响应构造辅助函数。

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
