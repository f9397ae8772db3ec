use chrono::NaiveDate;

use crate::{errors::ApiError, models::auth::Claim, models::user::User, state::AppState};

pub mod auth;
pub mod listing;
pub mod user;

/// Resolve the claim to a live user row. A stale token whose user is gone
/// carries no actor.
fn current_actor(state: &AppState, claim: &Claim) -> Result<User, ApiError> {
    state
        .store
        .get_user(claim.sub)?
        .ok_or(ApiError::Unauthenticated)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
