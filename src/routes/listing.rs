use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    middleware, Extension, Json,
};
use serde::Deserialize;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    auction::{bidding, lifecycle},
    errors::ApiError,
    middlewares::auth::auth_middleware,
    models::{
        auth::Claim,
        listing::{CreateListingRequest, Listing, PlaceBidRequest, UpdateListingRequest},
        ApiResult, PlainSuccessResponse,
    },
    state::AppState,
};

use super::{current_actor, today};

pub fn router(state: Arc<AppState>) -> OpenApiRouter<Arc<AppState>> {
    let protected = OpenApiRouter::new()
        .routes(routes!(add_listing, purge_listings))
        .routes(routes!(update_listing, withdraw_listing))
        .routes(routes!(place_bid))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    OpenApiRouter::new()
        .routes(routes!(list_listings))
        .routes(routes!(get_listing))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
struct ListListingsQuery {
    active: Option<bool>,
}

/// Get all listings, optionally only the ones currently open for bidding.
#[utoipa::path(
    get,
    path = "/v1/listings",
    tag = "Listing",
    params(
        ("active" = Option<bool>, Query, description = "Only listings inside their bidding window"),
    ),
    responses(
        (status = OK, description = "Returns listings", body = Vec<Listing>),
    ),
)]
async fn list_listings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListListingsQuery>,
) -> ApiResult<Json<Vec<Listing>>> {
    let listings = lifecycle::list_listings(
        &state.store,
        query.active.unwrap_or(false),
        today(),
    )?;
    Ok(Json(listings))
}

/// Get one listing by id.
#[utoipa::path(
    get,
    path = "/v1/listings/{id}",
    tag = "Listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    responses(
        (status = OK, description = "Returns the listing", body = Listing),
        (status = NOT_FOUND, description = "Listing not found", body = ApiError),
    ),
)]
async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Listing>> {
    let listing = state.store.get_listing(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(listing))
}

/// Create a listing owned by the current actor.
#[utoipa::path(
    post,
    path = "/v1/listings",
    tag = "Listing",
    request_body = CreateListingRequest,
    responses(
        (status = OK, description = "Listing created", body = Listing),
        (status = BAD_REQUEST, description = "Invalid dates or fields", body = ApiError),
        (status = UNAUTHORIZED, description = "No authenticated actor", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn add_listing(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateListingRequest>,
) -> ApiResult<Json<Listing>> {
    let actor = current_actor(&state, &claim)?;
    let listing =
        lifecycle::create_listing(&state.store, &actor, payload, today(), state.policy)?;
    Ok(Json(listing))
}

/// Partially update a listing. Owner or admin only.
#[utoipa::path(
    patch,
    path = "/v1/listings/{id}",
    tag = "Listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    request_body = UpdateListingRequest,
    responses(
        (status = OK, description = "Listing updated", body = Listing),
        (status = FORBIDDEN, description = "Not the owner or an admin", body = ApiError),
        (status = NOT_FOUND, description = "Listing not found", body = ApiError),
        (status = BAD_REQUEST, description = "Invalid dates or fields", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn update_listing(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateListingRequest>,
) -> ApiResult<Json<Listing>> {
    let actor = current_actor(&state, &claim)?;
    let listing = lifecycle::update_listing(&state.store, &actor, id, payload)?;
    Ok(Json(listing))
}

/// Withdraw a listing. Owner or admin only; allowed in any state.
#[utoipa::path(
    delete,
    path = "/v1/listings/{id}",
    tag = "Listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    responses(
        (status = OK, description = "Listing deleted", body = PlainSuccessResponse),
        (status = FORBIDDEN, description = "Not the owner or an admin", body = ApiError),
        (status = NOT_FOUND, description = "Listing not found", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn withdraw_listing(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<PlainSuccessResponse> {
    let actor = current_actor(&state, &claim)?;
    lifecycle::withdraw_listing(&state.store, &actor, id)?;
    Ok(PlainSuccessResponse::ok("listing deleted"))
}

/// Place a bid; the price must strictly exceed the current one and the
/// listing must be inside its bidding window.
#[utoipa::path(
    post,
    path = "/v1/listings/{id}/bid",
    tag = "Listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    request_body = PlaceBidRequest,
    responses(
        (status = OK, description = "Bid accepted", body = Listing),
        (status = BAD_REQUEST, description = "Bid not above the current price", body = ApiError),
        (status = CONFLICT, description = "Listing not active, or contention", body = ApiError),
        (status = NOT_FOUND, description = "Listing not found", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn place_bid(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<PlaceBidRequest>,
) -> ApiResult<Json<Listing>> {
    let actor = current_actor(&state, &claim)?;
    let listing = bidding::place_bid(&state.store, &actor, id, payload.new_price, today())?;
    Ok(Json(listing))
}

/// Delete every listing. Admin only; intended for administrative use.
#[utoipa::path(
    delete,
    path = "/v1/listings",
    tag = "Listing",
    responses(
        (status = OK, description = "All listings deleted", body = PlainSuccessResponse),
        (status = FORBIDDEN, description = "Not an admin", body = ApiError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn purge_listings(
    Extension(claim): Extension<Claim>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<PlainSuccessResponse> {
    let actor = current_actor(&state, &claim)?;
    let removed = lifecycle::purge_listings(&state.store, &actor)?;
    Ok(PlainSuccessResponse::ok(format!("{} listings deleted", removed)))
}
