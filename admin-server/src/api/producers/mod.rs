//! Producer API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/producers", get(handler::list))
        .route("/api/producers/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_producer"),
        ));

    let create_routes = Router::new()
        .route("/api/producers", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_producer"),
        ));

    let update_routes = Router::new()
        .route("/api/producers/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_producer"),
        ));

    let delete_routes = Router::new()
        .route("/api/producers/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_producer"),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
