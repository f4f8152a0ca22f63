//! Authentication middleware

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::db::users;
use crate::security_log;
use crate::state::ServerState;

/// Routes reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login"];

/// Authentication middleware
///
/// Validates `Authorization: Bearer <token>`, then reloads the user, their
/// role and its permissions from the database and injects the result as
/// [`CurrentUser`]. The token itself carries no permissions.
///
/// Skipped for `OPTIONS`, non-`/api/` paths and [`PUBLIC_API_ROUTES`].
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_ROUTES.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = req.uri().to_string());
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().to_string()
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::invalid_token("Invalid token"))?;

    let user = match users::find_session_user(&state.pool, user_id).await? {
        Some((user, true)) => user,
        Some((_, false)) => {
            security_log!("WARN", "auth_disabled_account", user_id = user_id);
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }
        None => {
            security_log!("WARN", "auth_unknown_user", user_id = user_id);
            return Err(AppError::invalid_token("Unknown user"));
        }
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// Permission middleware, evaluated through the state's [`AuthorizationPolicy`]
///
/// ```ignore
/// Router::new()
///     .route("/api/roles", get(handler::list))
///     .layer(middleware::from_fn_with_state(state.clone(), require_permission("view_role")));
/// ```
///
/// [`AuthorizationPolicy`]: crate::auth::AuthorizationPolicy
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(State<ServerState>, Request, Next) -> MiddlewareFuture + Clone {
    move |State(state): State<ServerState>, req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            state.policy.authorize(user, permission)?;

            Ok(next.run(req).await)
        })
    }
}
