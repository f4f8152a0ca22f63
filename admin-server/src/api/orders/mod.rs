//! Order API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/orders", get(handler::list))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_order"),
        ));

    let update_routes = Router::new()
        .route("/api/orders/{id}", put(handler::update_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_order"),
        ));

    let delete_routes = Router::new()
        .route("/api/orders/{id}", delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_order_special"),
        ));

    let pay_routes = Router::new()
        .route("/api/orders/{id}/pay", post(handler::pay))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("pay_order"),
        ));

    read_routes
        .merge(update_routes)
        .merge(delete_routes)
        .merge(pay_routes)
}
