//! Listing lifecycle: create, edit, withdraw, list, purge.

use chrono::NaiveDate;
use tracing::warn;

use crate::{
    constants::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN},
    errors::ApiError,
    models::{
        listing::{CreateListingRequest, Listing, UpdateListingRequest},
        user::User,
        ApiResult,
    },
    state::CreationPolicy,
    store::MemoryStore,
};

use super::access;

fn validate_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> ApiResult<()> {
    if description.is_some_and(|d| d.len() > MAX_DESCRIPTION_LEN) {
        return Err(ApiError::validation(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

/// Create a listing owned by `actor`. The current price starts at the
/// asking price and the winner is unset.
pub fn create_listing(
    store: &MemoryStore,
    actor: &User,
    req: CreateListingRequest,
    today: NaiveDate,
    policy: CreationPolicy,
) -> ApiResult<Listing> {
    validate_name(&req.name)?;
    validate_description(req.description.as_deref())?;
    if req.start_date > req.end_date {
        return Err(ApiError::InvalidRange);
    }
    if !policy.allow_past_start && req.start_date < today {
        return Err(ApiError::InvalidStartDate);
    }

    let listing = Listing {
        id: 0,
        name: req.name,
        description: req.description,
        start_date: req.start_date,
        end_date: req.end_date,
        asking_price: req.asking_price,
        current_price: req.asking_price,
        owner_id: actor.id,
        winner_id: None,
    };

    Ok(store.create_listing(listing)?)
}

/// Apply a partial update to a listing. Only supplied fields change; the
/// owner, asking price and current price never do.
pub fn update_listing(
    store: &MemoryStore,
    actor: &User,
    listing_id: u64,
    patch: UpdateListingRequest,
) -> ApiResult<Listing> {
    let mut listing = store.get_listing(listing_id)?.ok_or(ApiError::NotFound)?;
    access::ensure_can_modify(actor, listing.owner_id)?;

    if let Some(name) = patch.name {
        validate_name(&name)?;
        listing.name = name;
    }
    if let Some(description) = patch.description {
        validate_description(Some(description.as_str()))?;
        listing.description = Some(description);
    }
    if let Some(start_date) = patch.start_date {
        listing.start_date = start_date;
    }
    if let Some(end_date) = patch.end_date {
        listing.end_date = end_date;
    }
    if listing.start_date > listing.end_date {
        return Err(ApiError::InvalidRange);
    }

    if !store.update_listing(listing.clone())? {
        return Err(ApiError::NotFound);
    }
    Ok(listing)
}

/// Delete a listing in any state. A standing bid is discarded; settlement
/// is out of scope here, so the discard is only logged.
pub fn withdraw_listing(store: &MemoryStore, actor: &User, listing_id: u64) -> ApiResult<()> {
    let listing = store.get_listing(listing_id)?.ok_or(ApiError::NotFound)?;
    access::ensure_can_modify(actor, listing.owner_id)?;

    if let Some(winner_id) = listing.winner_id {
        warn!(
            listing_id = listing.id,
            winner_id, "withdrawing a listing with a standing bid"
        );
    }

    if !store.delete_listing(listing_id)? {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

/// All listings, optionally narrowed to the ones currently open for
/// bidding. The narrowing is a view concern.
pub fn list_listings(
    store: &MemoryStore,
    active_only: bool,
    today: NaiveDate,
) -> ApiResult<Vec<Listing>> {
    let mut listings = store.list_listings()?;
    if active_only {
        listings.retain(|l| l.is_active(today));
    }
    Ok(listings)
}

/// Delete every listing. Admin only.
pub fn purge_listings(store: &MemoryStore, actor: &User) -> ApiResult<usize> {
    if !actor.admin {
        return Err(ApiError::PermissionDenied);
    }
    Ok(store.clear_listings()?)
}
