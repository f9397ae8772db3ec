use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, Validation};

use crate::{errors::ApiError, models::auth::Claim, state::AppState};

/// Extracts and validates the bearer JWT, attaching the decoded claim as a
/// request extension. Any failure is the same condition from the caller's
/// point of view: no authenticated actor.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    // token should be "Bearer ..."
    let mut it = header.split_whitespace();
    let (_, token) = (it.next(), it.next());
    let token = token.ok_or(ApiError::Unauthenticated)?;

    let validation = Validation::new(Algorithm::HS256);
    let data = jsonwebtoken::decode::<Claim>(token, &state.jwt.1, &validation)
        .map_err(|_| ApiError::Unauthenticated)?;
    req.extensions_mut().insert(data.claims);

    Ok(next.run(req).await)
}
