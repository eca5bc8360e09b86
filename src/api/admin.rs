use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::model::employee::Gender;
use crate::model::user::User;
use crate::response;
use crate::validate::{
    FieldErrors, min_length, optional_string, required_date, required_gender, required_string,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAdmin {
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[schema(example = "jane.doe@example.com", format = "email")]
    pub email: Option<String>,
    /// At least 8 characters.
    #[schema(example = "hunter2hunter2")]
    pub password: Option<String>,
    #[schema(example = "1990-04-21", format = "date")]
    pub birth_date: Option<String>,
    #[schema(example = "female")]
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAdmin {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Optional here; when present it is re-hashed and must still be at
    /// least 8 characters.
    pub password: Option<String>,
    #[schema(example = "1990-04-21", format = "date")]
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}

/// Checked create payload. `password` is plaintext at this point and
/// gets hashed at the insert site.
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

/// Checked update payload; only the password may be absent.
pub struct AdminUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl CreateAdmin {
    fn validate(&self) -> Result<NewAdmin, ApiError> {
        let mut errors = FieldErrors::default();
        let first_name = required_string(&mut errors, "first_name", &self.first_name);
        let last_name = required_string(&mut errors, "last_name", &self.last_name);
        let email = required_string(&mut errors, "email", &self.email);
        let password = required_string(&mut errors, "password", &self.password);
        min_length(&mut errors, "password", &password, 8);
        let birth_date = required_date(&mut errors, "birth_date", &self.birth_date);
        let gender = required_gender(&mut errors, "gender", &self.gender);
        errors.into_result()?;

        Ok(NewAdmin {
            first_name,
            last_name,
            email,
            password,
            birth_date,
            gender,
        })
    }
}

impl UpdateAdmin {
    fn validate(&self) -> Result<AdminUpdate, ApiError> {
        let mut errors = FieldErrors::default();
        let first_name = required_string(&mut errors, "first_name", &self.first_name);
        let last_name = required_string(&mut errors, "last_name", &self.last_name);
        let email = required_string(&mut errors, "email", &self.email);
        let password = optional_string(&mut errors, "password", &self.password);
        if let Some(p) = &password {
            min_length(&mut errors, "password", p, 8);
        }
        let birth_date = required_date(&mut errors, "birth_date", &self.birth_date);
        let gender = required_gender(&mut errors, "gender", &self.gender);
        errors.into_result()?;

        Ok(AdminUpdate {
            first_name,
            last_name,
            email,
            password,
            birth_date,
            gender,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "1990-04-21")]
    pub birth_date: String,
    #[schema(example = "female")]
    pub gender: Gender,
    #[schema(example = "admin")]
    pub role: String,
    #[schema(example = "2026-08-25 09:30:00")]
    pub created_at: String,
    #[schema(example = "2026-08-25 09:30:00")]
    pub updated_at: String,
}

impl From<User> for AdminResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            birth_date: user.birth_date.format("%Y-%m-%d").to_string(),
            gender: user.gender,
            role: user.role,
            created_at: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: user.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

const SELECT_USER: &str = r#"
SELECT id, first_name, last_name, email, password, birth_date, gender, role,
       created_at, updated_at
FROM users
"#;

async fn fetch_user(pool: &SqlitePool, id: i64) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/* =========================
List admins
========================= */
#[utoipa::path(
    get,
    path = "/admins",
    responses(
        (status = 200, description = "All admin accounts", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE role = 'admin' ORDER BY id"))
        .fetch_all(pool.get_ref())
        .await?;

    let admins: Vec<AdminResponse> = users.into_iter().map(AdminResponse::from).collect();

    Ok(response::ok("Admins fetched successfully", admins))
}

/* =========================
Get admin by id
========================= */
#[utoipa::path(
    get,
    path = "/admins/{id}",
    params(("id", Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin found", body = AdminResponse),
        (status = 404, description = "Admin not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn get_admin(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let user = fetch_user(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::AdminNotFound)?;

    Ok(response::ok("Admin fetched successfully", AdminResponse::from(user)))
}

/* =========================
Create admin
========================= */
#[utoipa::path(
    post,
    path = "/admins",
    request_body = CreateAdmin,
    responses(
        (status = 200, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Validation failed"),
        (status = 422, description = "Email already exists", body = Object, example = json!({
            "success": false,
            "message": "Email already exists",
            "error": { "code": "EMAIL_CONFLICT", "details": "Email already exists" },
            "statusCode": 422
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateAdmin>,
) -> Result<HttpResponse, ApiError> {
    let input = payload.validate()?;

    // 1. Email must be free
    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(&input.email)
        .fetch_optional(pool.get_ref())
        .await?;
    if taken.is_some() {
        return Err(ApiError::EmailConflict);
    }

    // 2. Hash and insert
    let hashed = hash_password(&input.password)?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (first_name, last_name, email, password, birth_date, gender, role)
        VALUES (?, ?, ?, ?, ?, ?, 'admin')
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(&hashed)
    .bind(input.birth_date)
    .bind(input.gender)
    .execute(pool.get_ref())
    .await?;

    let id = result.last_insert_rowid();
    info!(admin_id = id, "Admin created");

    let user = fetch_user(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::AdminNotFound)?;

    Ok(response::ok("Create admin successfully", AdminResponse::from(user)))
}

/* =========================
Update admin
========================= */
#[utoipa::path(
    patch,
    path = "/admins/{id}",
    params(("id", Path, description = "Admin ID")),
    request_body = UpdateAdmin,
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn update_admin(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateAdmin>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = payload.validate()?;

    let existing = fetch_user(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    // No email-uniqueness pre-check on update; the UNIQUE constraint
    // still rejects hard collisions.
    let password = match &input.password {
        Some(plain) => hash_password(plain)?,
        None => existing.password,
    };

    sqlx::query(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, email = ?, password = ?, birth_date = ?,
            gender = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(&password)
    .bind(input.birth_date)
    .bind(input.gender)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    info!(admin_id = id, "Admin updated");

    let user = fetch_user(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(response::ok("Update admin successfully", AdminResponse::from(user)))
}

/* =========================
Delete admin
========================= */
#[utoipa::path(
    delete,
    path = "/admins/{id}",
    params(("id", Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deleted", body = Object, example = json!({
            "success": true,
            "message": "Admin deleted successfully",
            "statusCode": 200
        })),
        (status = 404, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::UserNotFound);
    }

    info!(admin_id = id, "Admin deleted");

    Ok(response::ok_empty("Admin deleted successfully"))
}
