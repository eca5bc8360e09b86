use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::employee::{Employee, Gender};
use crate::response;
use crate::validate::{FieldErrors, phone_shape, required_gender, required_string};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateEmployee {
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[schema(example = "Smith")]
    pub last_name: Option<String>,
    #[schema(example = "john.smith@example.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "+62 812-3456-7890")]
    pub phone_number: Option<String>,
    #[schema(example = "12 Jalan Merdeka, Jakarta")]
    pub address: Option<String>,
    #[schema(example = "male")]
    pub gender: Option<String>,
}

/// Same payload as [`CreateEmployee`]; updates replace every field.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
}

/// Checked employee payload, used by create and update alike.
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub gender: Gender,
}

fn validate_employee(
    first_name: &Option<String>,
    last_name: &Option<String>,
    email: &Option<String>,
    phone_number: &Option<String>,
    address: &Option<String>,
    gender: &Option<String>,
) -> Result<EmployeeInput, ApiError> {
    let mut errors = FieldErrors::default();
    let first_name = required_string(&mut errors, "first_name", first_name);
    let last_name = required_string(&mut errors, "last_name", last_name);
    let email = required_string(&mut errors, "email", email);
    let phone_number = required_string(&mut errors, "phone_number", phone_number);
    phone_shape(&mut errors, "phone_number", &phone_number);
    let address = required_string(&mut errors, "address", address);
    let gender = required_gender(&mut errors, "gender", gender);
    errors.into_result()?;

    Ok(EmployeeInput {
        first_name,
        last_name,
        email,
        phone_number,
        address,
        gender,
    })
}

impl CreateEmployee {
    fn validate(&self) -> Result<EmployeeInput, ApiError> {
        validate_employee(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone_number,
            &self.address,
            &self.gender,
        )
    }
}

impl UpdateEmployee {
    fn validate(&self) -> Result<EmployeeInput, ApiError> {
        validate_employee(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone_number,
            &self.address,
            &self.gender,
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Smith")]
    pub last_name: String,
    #[schema(example = "john.smith@example.com")]
    pub email: String,
    #[schema(example = "+62 812-3456-7890")]
    pub phone_number: String,
    #[schema(example = "12 Jalan Merdeka, Jakarta")]
    pub address: String,
    #[schema(example = "male")]
    pub gender: Gender,
    #[schema(example = "2026-08-25 09:30:00")]
    pub created_at: String,
    #[schema(example = "2026-08-25 09:30:00")]
    pub updated_at: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            phone_number: e.phone_number,
            address: e.address,
            gender: e.gender,
            created_at: e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: e.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

const SELECT_EMPLOYEE: &str = r#"
SELECT id, first_name, last_name, email, phone_number, address, gender,
       created_at, updated_at
FROM employees
"#;

async fn fetch_employee(pool: &SqlitePool, id: i64) -> Result<Option<Employee>, ApiError> {
    let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/* =========================
List employees
========================= */
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "All employees", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let employees = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} ORDER BY id"))
        .fetch_all(pool.get_ref())
        .await?;

    let employees: Vec<EmployeeResponse> =
        employees.into_iter().map(EmployeeResponse::from).collect();

    Ok(response::ok("Employees fetched successfully", employees))
}

/* =========================
Get employee by id
========================= */
#[utoipa::path(
    get,
    path = "/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::EmployeeNotFound)?;

    Ok(response::ok(
        "Employee fetched successfully",
        EmployeeResponse::from(employee),
    ))
}

/* =========================
Create employee
========================= */
#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Validation failed"),
        (status = 422, description = "Email already exists"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let input = payload.validate()?;

    // 1. Email must be free among employees
    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
        .bind(&input.email)
        .fetch_optional(pool.get_ref())
        .await?;
    if taken.is_some() {
        return Err(ApiError::EmailConflict);
    }

    // 2. Insert and echo the stored row back
    let result = sqlx::query(
        r#"
        INSERT INTO employees (first_name, last_name, email, phone_number, address, gender)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(&input.phone_number)
    .bind(&input.address)
    .bind(input.gender)
    .execute(pool.get_ref())
    .await?;

    let id = result.last_insert_rowid();
    info!(employee_id = id, "Employee created");

    let employee = fetch_employee(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::EmployeeNotFound)?;

    Ok(response::ok(
        "Create employee successfully",
        EmployeeResponse::from(employee),
    ))
}

/* =========================
Update employee
========================= */
#[utoipa::path(
    patch,
    path = "/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Email already exists"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = payload.validate()?;

    if fetch_employee(pool.get_ref(), id).await?.is_none() {
        return Err(ApiError::EmployeeNotFound);
    }

    // Email uniqueness, excluding this record itself
    let taken: Option<i64> =
        sqlx::query_scalar("SELECT id FROM employees WHERE email = ? AND id <> ?")
            .bind(&input.email)
            .bind(id)
            .fetch_optional(pool.get_ref())
            .await?;
    if taken.is_some() {
        return Err(ApiError::EmailConflict);
    }

    sqlx::query(
        r#"
        UPDATE employees
        SET first_name = ?, last_name = ?, email = ?, phone_number = ?, address = ?,
            gender = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(&input.phone_number)
    .bind(&input.address)
    .bind(input.gender)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    info!(employee_id = id, "Employee updated");

    let employee = fetch_employee(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::EmployeeNotFound)?;

    Ok(response::ok(
        "Update employee successfully",
        EmployeeResponse::from(employee),
    ))
}

/* =========================
Delete employee
========================= */
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted successfully",
            "statusCode": 200
        })),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    // Leave records go with their employee via the cascading foreign key.
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::EmployeeNotFound);
    }

    info!(employee_id = id, "Employee deleted");

    Ok(response::ok_empty("Employee deleted successfully"))
}
