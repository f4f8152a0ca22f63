//! HTTP API
//!
//! One module per resource, each exposing `router()`. Read and write
//! routes sit behind separate `require_permission` layers.
//!
//! - [`health`] - liveness (public)
//! - [`auth`] - login and session snapshot
//! - [`roles`] - roles and the permission catalog
//! - [`users`] - staff and client accounts
//! - [`categories`], [`producers`] - catalog taxonomy
//! - [`products`] - products, approval and images
//! - [`quotations`] - quotations, pricing and comments
//! - [`orders`] - orders and payments

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod producers;
pub mod products;
pub mod quotations;
pub mod roles;
pub mod users;

use axum::Router;
use axum::middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::state::ServerState;

pub use shared::error::AppResult;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Every route, without global middleware
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(roles::router(state))
        .merge(users::router(state))
        .merge(categories::router(state))
        .merge(producers::router(state))
        .merge(products::router(state))
        .merge(quotations::router(state))
        .merge(orders::router(state))
}

/// Fully layered application, shared by `main` and the router tests
pub fn build_app(state: ServerState) -> Router {
    build_router(&state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Runs before any route; injects CurrentUser
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}
