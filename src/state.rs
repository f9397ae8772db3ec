use std::env;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};

use crate::store::MemoryStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creation-time policy: whether a listing may start in the past. Off by
/// default; `ALLOW_PAST_START_DATE=1` relaxes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreationPolicy {
    pub allow_past_start: bool,
}

pub struct AppState {
    pub store: MemoryStore,
    pub jwt: (EncodingKey, DecodingKey, Header),
    pub policy: CreationPolicy,
}

impl AppState {
    pub fn new() -> Result<Self, BoxError> {
        let secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?;
        let allow_past_start = env::var("ALLOW_PAST_START_DATE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            store: MemoryStore::default(),
            jwt: (
                EncodingKey::from_base64_secret(&secret)?,
                DecodingKey::from_base64_secret(&secret)?,
                Header::new(Algorithm::HS256),
            ),
            policy: CreationPolicy { allow_past_start },
        })
    }

    #[cfg(test)]
    pub fn test() -> Self {
        Self::with_policy(CreationPolicy::default())
    }

    #[cfg(test)]
    pub fn with_policy(policy: CreationPolicy) -> Self {
        // "test-jwt-secret" in base64; tests never read the environment.
        const DEV_SECRET: &str = "dGVzdC1qd3Qtc2VjcmV0";

        Self {
            store: MemoryStore::default(),
            jwt: (
                EncodingKey::from_base64_secret(DEV_SECRET).unwrap(),
                DecodingKey::from_base64_secret(DEV_SECRET).unwrap(),
                Header::new(Algorithm::HS256),
            ),
            policy,
        }
    }
}
