use std::sync::Arc;

use axum::{
    extract::{Path, State},
    middleware, Extension, Json,
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    auction::account,
    errors::ApiError,
    middlewares::auth::auth_middleware,
    models::{
        auth::Claim,
        user::{UpdateUserRequest, UserProfile},
        ApiResult, PlainSuccessResponse,
    },
    state::AppState,
};

use super::current_actor;

pub fn router(state: Arc<AppState>) -> OpenApiRouter<Arc<AppState>> {
    let protected = OpenApiRouter::new()
        .routes(routes!(update_user, delete_user))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(get_user))
        .merge(protected)
}

/// Get all users.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "User",
    responses(
        (status = OK, description = "Returns all users", body = Vec<UserProfile>),
    ),
)]
async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<UserProfile>>> {
    let users = state.store.list_users()?;
    Ok(Json(users.iter().map(UserProfile::from).collect()))
}

/// Get one user by id.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "User",
    params(
        ("id" = u64, Path, description = "User id"),
    ),
    responses(
        (status = OK, description = "Returns the user", body = UserProfile),
        (status = NOT_FOUND, description = "User not found", body = ApiError),
    ),
)]
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<UserProfile>> {
    let user = state.store.get_user(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(UserProfile::from(&user)))
}

/// Partially update a user. Self or admin only.
#[utoipa::path(
    patch,
    path = "/v1/users/{id}",
    tag = "User",
    params(
        ("id" = u64, Path, description = "User id"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = OK, description = "User updated", body = UserProfile),
        (status = FORBIDDEN, description = "Not the user or an admin", body = ApiError),
        (status = CONFLICT, description = "Nick already taken", body = ApiError),
        (status = UNAUTHORIZED, description = "Wrong current password", body = ApiError),
        (status = NOT_FOUND, description = "User not found", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn update_user(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let actor = current_actor(&state, &claim)?;
    let user = account::update_user(&state.store, &actor, id, payload)?;
    Ok(Json(UserProfile::from(&user)))
}

/// Delete a user and every listing they own. Self or admin only.
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "User",
    params(
        ("id" = u64, Path, description = "User id"),
    ),
    responses(
        (status = OK, description = "User deleted", body = PlainSuccessResponse),
        (status = FORBIDDEN, description = "Not the user or an admin", body = ApiError),
        (status = NOT_FOUND, description = "User not found", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn delete_user(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<PlainSuccessResponse> {
    let actor = current_actor(&state, &claim)?;
    account::delete_user(&state.store, &actor, id)?;
    Ok(PlainSuccessResponse::ok("user deleted"))
}
