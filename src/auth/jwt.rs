use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id.
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_access_token(
    user_id: i64,
    email: &str,
    role: &str,
    secret: &str,
    ttl: u64,
) -> Result<String, ApiError> {
    let issued_at = now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        iat: issued_at,
        exp: issued_at + ttl as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign access token: {e}")))
}

/// Decodes and checks the signature and expiry. An expired signature is
/// reported separately so the guard can answer `TOKEN_EXPIRED`.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::TokenInvalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_its_claims() {
        let token = generate_access_token(7, "admin@example.com", "admin", SECRET, 3600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let a = generate_access_token(1, "a@example.com", "admin", SECRET, 3600).unwrap();
        let b = generate_access_token(1, "a@example.com", "admin", SECRET, 3600).unwrap();

        let ja = verify_token(&a, SECRET).unwrap().jti;
        let jb = verify_token(&b, SECRET).unwrap().jti;
        assert_ne!(ja, jb);
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = generate_access_token(1, "a@example.com", "admin", SECRET, 3600).unwrap();
        match verify_token(&token, "other-secret") {
            Err(ApiError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Well past the validator's default leeway.
        let issued_at = now() - 7200;
        let claims = Claims {
            sub: 1,
            email: "a@example.com".into(),
            role: "admin".into(),
            iat: issued_at,
            exp: issued_at + 60,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match verify_token(&token, SECRET) {
            Err(ApiError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_invalid() {
        match verify_token("not.a.token", SECRET) {
            Err(ApiError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }
}
