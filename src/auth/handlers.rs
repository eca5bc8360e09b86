use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::api::admin::AdminResponse;
use crate::auth::auth::AuthUser;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::auth::revocation::RevocationSet;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::user::User;
use crate::response;
use crate::validate::{FieldErrors, required_string};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

impl LoginRequest {
    fn validate(&self) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::default();
        let email = required_string(&mut errors, "email", &self.email);
        let password = required_string(&mut errors, "password", &self.password);
        errors.into_result()?;
        Ok((email, password))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginData {
    pub access_token: String,
    #[serde(rename = "expiresIn")]
    #[schema(example = 3600)]
    pub expires_in: u64,
}

/// Login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = Object, example = json!({
            "success": true,
            "message": "Login successful",
            "data": { "access_token": "eyJ...", "expiresIn": 3600 },
            "statusCode": 200
        })),
        (status = 400, description = "Invalid credentials or malformed payload")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip_all)]
pub async fn login(
    payload: web::Json<LoginRequest>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    // 1. Validate payload
    let (email, password) = payload.validate()?;

    debug!(email = %email, "Fetching admin account");

    // 2. Fetch account by email
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, first_name, last_name, email, password, birth_date, gender, role,
               created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| {
        info!("Invalid credentials: unknown email");
        ApiError::InvalidCredentials
    })?;

    // 3. Verify password
    if !verify_password(&password, &user.password) {
        info!(user_id = user.id, "Invalid credentials: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    // 4. Issue access token
    let access_token = generate_access_token(
        user.id,
        &user.email,
        &user.role,
        &config.jwt_secret,
        config.jwt_ttl,
    )?;

    info!(user_id = user.id, "Login successful");

    Ok(response::ok(
        "Login successful",
        LoginData {
            access_token,
            expires_in: config.jwt_ttl,
        },
    ))
}

/// Logout
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Token revoked", body = Object, example = json!({
            "success": true,
            "message": "Logout successful",
            "data": null,
            "statusCode": 200
        })),
        (status = 401, description = "Missing, invalid, expired or blacklisted token")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn logout(
    auth: AuthUser,
    revocations: web::Data<RevocationSet>,
) -> Result<HttpResponse, ApiError> {
    // The presented token itself goes on the blacklist; it stays there
    // until it would have expired anyway.
    revocations.revoke(&auth.token).await;

    info!(user_id = auth.user_id, "Logout successful");

    Ok(response::ok("Logout successful", serde_json::Value::Null))
}

/// Current session profile
#[utoipa::path(
    get,
    path = "/auth/sessions",
    responses(
        (status = 200, description = "Caller's admin profile", body = Object),
        (status = 401, description = "Missing, invalid, expired or blacklisted token"),
        (status = 404, description = "Account deleted after the token was issued")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn sessions(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, first_name, last_name, email, password, birth_date, gender, role,
               created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::AdminNotFound)?;

    Ok(response::ok(
        "Sessions fetched successfully",
        AdminResponse::from(user),
    ))
}
