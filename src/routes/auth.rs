use std::sync::Arc;

use axum::{extract::State, middleware, Extension, Json};
use chrono::{Duration, TimeDelta};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    auction::account,
    errors::ApiError,
    middlewares::auth::auth_middleware,
    models::{
        auth::{Claim, LoginPayload, RegisterPayload, UserInfo},
        user::UserProfile,
        ApiResult, PlainSuccessResponse,
    },
    state::AppState,
};

use super::{current_actor, today};

const TOKEN_EXPIRATION_DURATION: TimeDelta = Duration::hours(5);

pub fn router(state: Arc<AppState>) -> OpenApiRouter<Arc<AppState>> {
    let protected = OpenApiRouter::new()
        .routes(routes!(logout))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .merge(protected)
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = OK, description = "Register success", body = UserProfile),
        (status = CONFLICT, description = "Nick already taken", body = ApiError),
        (status = BAD_REQUEST, description = "Missing or oversized field", body = ApiError),
    ),
)]
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> ApiResult<Json<UserProfile>> {
    let user = account::register(&state.store, payload, today())?;
    Ok(Json(UserProfile::from(&user)))
}

/// Log in with nick and password; returns the profile plus a signed token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = OK, description = "Login success", body = UserInfo),
        (status = UNAUTHORIZED, description = "Wrong nick or password", body = ApiError),
    ),
)]
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<Json<UserInfo>> {
    let user = account::authenticate(&state.store, &payload.nick, &payload.password)?;

    let claim = Claim::new(&user, TOKEN_EXPIRATION_DURATION);
    let token = jsonwebtoken::encode(&state.jwt.2, &claim, &state.jwt.0)?;

    Ok(Json(UserInfo::new(&user, token)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = OK, description = "Logout success", body = PlainSuccessResponse),
        (status = UNAUTHORIZED, description = "No authenticated actor", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn logout(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<PlainSuccessResponse> {
    let actor = current_actor(&state, &claim)?;
    account::deactivate(&state.store, actor.id)?;

    Ok(PlainSuccessResponse::ok("logged out"))
}
