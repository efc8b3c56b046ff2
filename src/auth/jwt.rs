use std::time::Duration;

use jsonwebtoken::{encode, EncodingKey, Header};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{auth::claims::Claims, config::ConfigError};

/// Lifetime of every issued access token.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Signing key built once at startup and shared for the life of the process.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            ttl: TOKEN_TTL,
        })
    }

    /// Signs an HS256 token carrying the user's id and email.
    pub fn issue(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }
}
