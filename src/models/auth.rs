use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::User;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    /// Unique nick.
    pub nick: String,
    /// Password in plaintext; stored only as a hash.
    pub password: String,
    /// User first name.
    pub first_name: Option<String>,
    /// User last name.
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Unique nick.
    pub nick: String,
    /// Password in plaintext.
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Numeric id.
    pub id: u64,
    /// Unique nick.
    pub nick: String,
    /// User first name.
    pub first_name: Option<String>,
    /// User last name.
    pub last_name: Option<String>,
    /// Elevated permission flag.
    pub admin: bool,
    /// Signed JWT token.
    pub token: String,
}

impl UserInfo {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            nick: user.nick.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            admin: user.admin,
            token,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Claim {
    /// User id.
    pub sub: u64,
    /// Unique nick.
    pub nick: String,
    /// Elevated permission flag.
    pub admin: bool,
    /// Expire time.
    pub exp: u64,
    /// Issue time.
    pub iat: u64,
}

impl Claim {
    pub fn new(user: &User, valid_for: TimeDelta) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            nick: user.nick.clone(),
            admin: user.admin,
            exp: (now + valid_for).timestamp() as u64,
            iat: now.timestamp() as u64,
        }
    }
}
