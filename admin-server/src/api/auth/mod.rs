//! Auth API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::ServerState;

/// `/api/auth/login` is public; `/api/auth/me` only needs a valid token
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
}
