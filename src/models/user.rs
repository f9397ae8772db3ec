use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::listing::date_format;

/// A user row as the store holds it. Carries the password hash, so it is
/// never serialized directly; responses go through [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Numeric id, assigned by the store.
    pub id: u64,
    /// Unique nick.
    pub nick: String,
    /// User first name.
    pub first_name: Option<String>,
    /// User last name.
    pub last_name: Option<String>,
    /// Password hash in scrypt PHC form.
    pub password: String,
    /// Set once at registration.
    pub register_date: NaiveDate,
    /// True while a session is live. Presentation state, not an
    /// authorization gate.
    pub active: bool,
    /// Grants elevated permission; set only at creation or by hand.
    pub admin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Numeric id.
    pub id: u64,
    /// Unique nick.
    pub nick: String,
    /// User first name.
    pub first_name: Option<String>,
    /// User last name.
    pub last_name: Option<String>,
    /// Registration date.
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "20.11.2024")]
    pub register_date: NaiveDate,
    /// True while a session is live.
    pub active: bool,
    /// Elevated permission flag.
    pub admin: bool,
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            nick: value.nick.clone(),
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
            register_date: value.register_date,
            active: value.active,
            admin: value.admin,
        }
    }
}

/// Partial update; absent fields keep their prior value. A password change
/// needs the current password alongside the new one.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New nick; re-checked for uniqueness.
    pub nick: Option<String>,
    /// User first name.
    pub first_name: Option<String>,
    /// User last name.
    pub last_name: Option<String>,
    /// Current password, verified before a password change.
    pub old_password: Option<String>,
    /// Replacement password.
    pub new_password: Option<String>,
}
