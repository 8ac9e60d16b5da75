//! Stay Request API 模块
//!
//! 访客创建/查看/修改自己的申请；员工查看全部并做出审批决定。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/room-requests", routes().merge(staff_routes()))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::withdraw))
        .route("/{id}/people", put(handler::update_people))
}

fn staff_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/admin", put(handler::admin_update))
        .route("/{id}/process", put(handler::process))
        .route_layer(middleware::from_fn(require_staff))
}
