use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt;
use crate::auth::revocation::RevocationSet;
use crate::config::Config;
use crate::error::ApiError;

/// Authenticated admin, extracted from the `Authorization: Bearer` header.
/// Rejection order: missing header, then signature/expiry, then blacklist.
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: String,

    /// The exact token string that was presented; logout revokes it.
    pub token: String,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(ApiError::TokenMissing)?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ApiError::Internal("Config not registered on the app".to_string()))?;

    let claims = jwt::verify_token(token, &config.jwt_secret)?;

    let revocations = req
        .app_data::<Data<RevocationSet>>()
        .ok_or_else(|| ApiError::Internal("RevocationSet not registered on the app".to_string()))?;

    if revocations.contains(token) {
        return Err(ApiError::TokenBlacklisted);
    }

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
        token: token.to_string(),
    })
}
