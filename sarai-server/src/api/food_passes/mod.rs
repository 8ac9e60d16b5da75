//! Meal Pass API 模块
//!
//! 签发、扫码核销、修正是员工操作；住客可以查看自己的券。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/food-passes", routes().merge(staff_routes()))
}

fn routes() -> Router<ServerState> {
    Router::new().route("/user/{user_id}", get(handler::list_for_user))
}

fn staff_routes() -> Router<ServerState> {
    Router::new()
        .route("/generate", post(handler::generate))
        .route("/scan", post(handler::scan))
        .route("/{id}", put(handler::update))
        .route_layer(middleware::from_fn(require_staff))
}
