//! JWT Token Service
//!
//! Issues and verifies signed, time-bounded session tokens. Tokens are
//! self-contained and unrevocable before expiry; there is no server-side
//! blacklist.

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

pub struct JwtHandler {
    secret: String,
    ttl_hours: i64,
}

impl JwtHandler {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Issue a token embedding the user's id and admin flag.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .context("Invalid expiry timestamp")?;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        debug!(
            "Issuing token for user {} ({}), ttl {}h",
            user.username, user.id, self.ttl_hours
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Verify a token and extract its claims. Expired, tampered, and
    /// malformed tokens all collapse into the same failure.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        Ok(decoded.claims)
    }
}
