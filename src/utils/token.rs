use chrono::Duration;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;

/// Mints an HS256 session token for a logged-in admin. The expiry is
/// absolute, so a token keeps working across restarts until `ttl_minutes`
/// after login.
pub fn mint_session_token(
    admin_id: Uuid,
    email: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String> {
    let expires_at = crate::utils::time::now() + Duration::minutes(ttl_minutes);
    let claims = Claims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        exp: expires_at.timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("token minting failed: {e}")))
}
