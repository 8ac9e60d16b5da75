//! Room Assignment API 模块
//!
//! 台账和入住/退房流程全部是员工操作；访客只能查询自己名下的分配。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/room-assignments", routes().merge(staff_routes()))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/user/{user_id}", get(handler::list_for_user))
        .route("/{id}", get(handler::get_by_id))
}

fn staff_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}/check-in", put(handler::check_in))
        .route("/{id}/check-out", put(handler::check_out))
        .route_layer(middleware::from_fn(require_staff))
}
