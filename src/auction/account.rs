//! Account operations: register, authenticate, edit, delete. Passwords are
//! scrypt PHC strings; plaintext never leaves the hashing boundary.

use chrono::NaiveDate;
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use tracing::info;

use crate::{
    constants::MAX_NAME_LEN,
    errors::ApiError,
    models::{
        auth::RegisterPayload,
        user::{UpdateUserRequest, User},
        ApiResult,
    },
    store::MemoryStore,
};

use super::access;

// Explicit cost parameters; the PHC string records them, so they can be
// raised later without breaking stored hashes.
fn scrypt_params() -> Params {
    Params::new(12, 8, 1, 32).expect("static scrypt params are valid")
}

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(password.as_bytes(), None, None, scrypt_params(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, stored: &str) -> ApiResult<()> {
    let parsed = PasswordHash::new(stored)?;
    Scrypt
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)
}

fn validate_required(field: &'static str, value: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    validate_len(field, value)
}

fn validate_len(field: &'static str, value: &str) -> ApiResult<()> {
    if value.len() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Register a new user. The nick must be unique; the account starts active
/// and without admin rights.
pub fn register(store: &MemoryStore, payload: RegisterPayload, today: NaiveDate) -> ApiResult<User> {
    validate_required("nick", &payload.nick)?;
    validate_required("password", &payload.password)?;
    if let Some(first_name) = payload.first_name.as_deref() {
        validate_len("first name", first_name)?;
    }
    if let Some(last_name) = payload.last_name.as_deref() {
        validate_len("last name", last_name)?;
    }

    let user = User {
        id: 0,
        nick: payload.nick.clone(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        password: hash_password(&payload.password)?,
        register_date: today,
        active: true,
        admin: false,
    };

    store
        .create_user(user)?
        .ok_or(ApiError::DuplicateNick(payload.nick))
}

/// Verify credentials and mark the session live.
pub fn authenticate(store: &MemoryStore, nick: &str, password: &str) -> ApiResult<User> {
    let mut user = store
        .find_user_by_nick(nick)?
        .ok_or(ApiError::InvalidCredentials)?;
    verify_password(password, &user.password)?;

    user.active = true;
    store.put_user(user.clone())?;
    Ok(user)
}

/// End the session: the active flag is presentation state only.
pub fn deactivate(store: &MemoryStore, user_id: u64) -> ApiResult<()> {
    let mut user = store.get_user(user_id)?.ok_or(ApiError::Unauthenticated)?;
    user.active = false;
    store.put_user(user)?;
    Ok(())
}

/// Apply a partial update to a user. Self or admin only; a nick change
/// re-checks uniqueness, a password change verifies the current password
/// against the target's hash first.
pub fn update_user(
    store: &MemoryStore,
    actor: &User,
    target_user_id: u64,
    patch: UpdateUserRequest,
) -> ApiResult<User> {
    let mut user = store.get_user(target_user_id)?.ok_or(ApiError::NotFound)?;
    access::ensure_is_self(actor, target_user_id)?;

    if let Some(nick) = patch.nick {
        validate_required("nick", &nick)?;
        user.nick = nick;
    }
    if let Some(first_name) = patch.first_name {
        validate_len("first name", &first_name)?;
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = patch.last_name {
        validate_len("last name", &last_name)?;
        user.last_name = Some(last_name);
    }
    if let Some(new_password) = patch.new_password {
        let old_password = patch.old_password.as_deref().ok_or_else(|| {
            ApiError::validation("old password is required to change the password")
        })?;
        verify_password(old_password, &user.password)?;
        validate_required("password", &new_password)?;
        user.password = hash_password(&new_password)?;
    }

    let nick = user.nick.clone();
    store.update_user(user)?.ok_or(ApiError::DuplicateNick(nick))
}

/// Delete a user and, explicitly, every listing they own.
pub fn delete_user(store: &MemoryStore, actor: &User, target_user_id: u64) -> ApiResult<()> {
    store.get_user(target_user_id)?.ok_or(ApiError::NotFound)?;
    access::ensure_is_self(actor, target_user_id)?;

    let removed = store.delete_listings_owned_by(target_user_id)?;
    if removed > 0 {
        info!(
            user_id = target_user_id,
            listings = removed,
            "cascade-deleted owned listings"
        );
    }
    if !store.delete_user(target_user_id)? {
        return Err(ApiError::NotFound);
    }
    Ok(())
}
