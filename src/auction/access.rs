use crate::{errors::ApiError, models::user::User};

/// Owner-or-admin predicate guarding every mutating listing operation.
pub fn can_modify(actor: &User, owner_id: u64) -> bool {
    actor.admin || actor.id == owner_id
}

/// Self-or-admin predicate guarding account operations.
pub fn is_self(actor: &User, target_user_id: u64) -> bool {
    actor.admin || actor.id == target_user_id
}

pub fn ensure_can_modify(actor: &User, owner_id: u64) -> Result<(), ApiError> {
    if can_modify(actor, owner_id) {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied)
    }
}

pub fn ensure_is_self(actor: &User, target_user_id: u64) -> Result<(), ApiError> {
    if is_self(actor, target_user_id) {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied)
    }
}
