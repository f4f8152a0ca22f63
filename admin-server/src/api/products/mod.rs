//! Product API Module
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/products | GET | view_product |
//! | /api/products/{id} | GET | view_product |
//! | /api/products | POST | create_product |
//! | /api/products/{id} | PUT | update_product |
//! | /api/products/{id} | DELETE | delete_product |
//! | /api/products/{id}/authorize | POST | depends on the tag |
//! | /api/products/{id}/images | POST | upload_file |
//! | /api/products/{id}/images/{name} | DELETE | delete_file |

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::state::ServerState;

/// Request body cap for multi-file image uploads
const MAX_UPLOAD_BODY: usize = 50 * 1024 * 1024;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/products", get(handler::list))
        .route("/api/products/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("view_product"),
        ));

    let create_routes = Router::new()
        .route("/api/products", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("create_product"),
        ));

    let update_routes = Router::new()
        .route("/api/products/{id}", put(handler::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("update_product"),
        ));

    let delete_routes = Router::new()
        .route("/api/products/{id}", delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_product"),
        ));

    // The handler checks the permission of the requested tag
    let approval_routes =
        Router::new().route("/api/products/{id}/authorize", post(handler::toggle_approval));

    let upload_routes = Router::new()
        .route("/api/products/{id}/images", post(handler::upload_images))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("upload_file"),
        ));

    let image_delete_routes = Router::new()
        .route("/api/products/{id}/images/{name}", delete(handler::delete_image))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission("delete_file"),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
        .merge(approval_routes)
        .merge(upload_routes)
        .merge(image_delete_routes)
}
