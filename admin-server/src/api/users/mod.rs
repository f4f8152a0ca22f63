//! User API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/users", get(handler::list))
        .route("/api/users/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_user"),
        ));

    let create_routes = Router::new()
        .route("/api/users", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_user"),
        ));

    let update_routes = Router::new()
        .route("/api/users/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_user"),
        ));

    let delete_routes = Router::new()
        .route("/api/users/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_user"),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
