//! Role API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/roles", get(handler::list))
        .route("/api/roles/{id}", get(handler::get_by_id))
        .route("/api/permissions", get(handler::get_all_permissions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_role"),
        ));

    let create_routes = Router::new()
        .route("/api/roles", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_role"),
        ));

    let update_routes = Router::new()
        .route("/api/roles/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_role"),
        ));

    let delete_routes = Router::new()
        .route("/api/roles/{id}", delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_role"),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
