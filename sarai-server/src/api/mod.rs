//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`rooms`] - 房间管理接口
//! - [`room_requests`] - 住宿申请接口
//! - [`assignments`] - 房间分配 (入住/退房) 接口
//! - [`food_passes`] - 餐券接口
//! - [`categories`] - 目录管理接口 (房型 / 餐厅)

pub mod health;

pub mod assignments;
pub mod categories;
pub mod food_passes;
pub mod room_requests;
pub mod rooms;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok, ok_with_message};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the full application router with state and middleware applied.
pub fn build_router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(rooms::router())
        .merge(room_requests::router())
        .merge(assignments::router())
        .merge(food_passes::router())
        .merge(categories::router())
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
