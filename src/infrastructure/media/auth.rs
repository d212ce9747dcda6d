use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MediaConfig, MediaError};

const TOKEN_TTL_SECS: i64 = 10 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct AppClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Application token for the `Authorization` header, signed with the shared
/// secret (HS256).
pub fn sign_app_token(config: &MediaConfig, now: i64) -> Result<String, MediaError> {
    let urn = format!("urn:app:{}", config.app_id);
    let claims = AppClaims {
        sub: urn.clone(),
        iss: urn,
        iat: now,
        exp: now + TOKEN_TTL_SECS,
        jti: Uuid::new_v4().simple().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.shared_secret.as_bytes()),
    )?;
    Ok(token)
}
