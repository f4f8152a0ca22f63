//! Quotation API Module
//!
//! Client users only ever see and touch their own quotations.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/quotations", get(handler::list))
        .route("/api/quotations/{id}", get(handler::get_by_id))
        .route("/api/quotations/{id}/pricing", get(handler::pricing))
        .route("/api/quotations/{id}/comments", get(handler::list_comments))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_quotation"),
        ));

    let create_routes = Router::new()
        .route("/api/quotations", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_quotation"),
        ));

    let update_routes = Router::new()
        .route("/api/quotations/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_quotation"),
        ));

    let delete_routes = Router::new()
        .route("/api/quotations/{id}", delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_quotation"),
        ));

    let comment_routes = Router::new()
        .route("/api/quotations/{id}/comments", post(handler::add_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("comment_quotation"),
        ));

    let order_routes = Router::new()
        .route("/api/quotations/{id}/order", post(handler::create_order))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_order"),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
        .merge(comment_routes)
        .merge(order_routes)
}
