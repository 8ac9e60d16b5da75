//! Catalog API 模块 (房型目录 / 餐厅目录)
//!
//! 目录维护是后台配置，读写都只对超级管理员开放。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_super_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/rooms",
            get(handler::list_room_categories).post(handler::create_room_category),
        )
        .route(
            "/rooms/{id}",
            get(handler::get_room_category)
                .put(handler::update_room_category)
                .delete(handler::delete_room_category),
        )
        .route(
            "/dining-halls",
            get(handler::list_dining_halls).post(handler::create_dining_hall),
        )
        .route(
            "/dining-halls/{id}",
            get(handler::get_dining_hall)
                .put(handler::update_dining_hall)
                .delete(handler::delete_dining_hall),
        )
        .route_layer(middleware::from_fn(require_super_admin))
}
