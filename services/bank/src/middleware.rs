//! Bearer-token middleware guarding the transaction routes

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::AppState;

/// Extract and verify the bearer token from the Authorization header
///
/// A missing or malformed header is 401; a token that fails verification
/// (bad signature, expired) is 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state.tokens.verify_token(token).map_err(|e| {
        error!("Failed to verify token: {}", e);
        StatusCode::FORBIDDEN
    })?;

    // Make the authenticated user id available to handlers
    req.extensions_mut().insert(claims.sub);

    Ok(next.run(req).await)
}
