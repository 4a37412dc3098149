use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// JWT claims of an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id as a decimal string.
    pub sub: String,
    /// `"user"` or `"admin"`.
    pub role: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// The user id carried in `sub`, if it is one.
    #[must_use]
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Sign an access token for `user_id`.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn issue_access_token(user_id: i32, role: &str, config: &Config) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    #[allow(clippy::cast_possible_wrap)]
    let exp = now + config.jwt_access_expiration_secs as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode access token: {e}"))
}

/// Validate an access token and return its claims.
///
/// # Errors
///
/// Returns an error if the signature is wrong or the token has expired.
pub fn validate_access_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| anyhow::anyhow!("Invalid access token: {e}"))
}
