use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

/// Mints tokens the way the identity provider does, for tests only.
#[cfg(test)]
pub fn generate_token(
    user_id: u64,
    username: &str,
    token_type: crate::models::TokenType,
    secret: &str,
    ttl: usize,
) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        user_id,
        sub: username.to_string(),
        exp: now + ttl,
        jti: uuid::Uuid::new_v4().to_string(),
        token_type,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
