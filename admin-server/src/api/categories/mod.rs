//! Category API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/categories", get(handler::list))
        .route("/api/categories/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_category"),
        ));

    let create_routes = Router::new()
        .route("/api/categories", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_category"),
        ));

    let update_routes = Router::new()
        .route("/api/categories/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_category"),
        ));

    let delete_routes = Router::new()
        .route("/api/categories/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_category"),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
