use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::api::employee::EmployeeResponse;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::leave::eligibility::{self, LeaveSpan};
use crate::leave::filter::{self, LeaveFilter};
use crate::model::leave_record::{LeaveRecord, LeaveWithEmployee};
use crate::response;
use crate::validate::{FieldErrors, required_date, required_i64, required_string};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLeaveRecord {
    #[schema(example = 1)]
    pub employee_id: Option<i64>,
    #[schema(example = "Family visit")]
    pub reason: Option<String>,
    #[schema(example = "2026-03-10", format = "date")]
    pub start_date: Option<String>,
    #[schema(example = "2026-03-12", format = "date")]
    pub end_date: Option<String>,
}

/// Same payload as [`CreateLeaveRecord`]; updates replace every field
/// and may move the record to a different employee.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateLeaveRecord {
    pub employee_id: Option<i64>,
    pub reason: Option<String>,
    #[schema(example = "2026-03-10", format = "date")]
    pub start_date: Option<String>,
    #[schema(example = "2026-03-12", format = "date")]
    pub end_date: Option<String>,
}

/// Checked leave payload, used by create and update alike.
pub struct LeaveInput {
    pub employee_id: i64,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_leave(
    employee_id: &Option<i64>,
    reason: &Option<String>,
    start_date: &Option<String>,
    end_date: &Option<String>,
) -> Result<LeaveInput, ApiError> {
    let mut errors = FieldErrors::default();
    let employee_id = required_i64(&mut errors, "employee_id", employee_id);
    let reason = required_string(&mut errors, "reason", reason);
    let start_date = required_date(&mut errors, "start_date", start_date);
    let end_date = required_date(&mut errors, "end_date", end_date);
    errors.into_result()?;

    Ok(LeaveInput {
        employee_id,
        reason,
        start_date,
        end_date,
    })
}

impl CreateLeaveRecord {
    fn validate(&self) -> Result<LeaveInput, ApiError> {
        validate_leave(&self.employee_id, &self.reason, &self.start_date, &self.end_date)
    }
}

impl UpdateLeaveRecord {
    fn validate(&self) -> Result<LeaveInput, ApiError> {
        validate_leave(&self.employee_id, &self.reason, &self.start_date, &self.end_date)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaveQuery {
    /// Start-month filter, 1-12.
    pub month: Option<String>,
    /// Start-year filter, e.g. 2026.
    pub year: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveRecordResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "Family visit")]
    pub reason: String,
    #[schema(example = "2026-03-10")]
    pub start_date: String,
    #[schema(example = "2026-03-12")]
    pub end_date: String,
    #[schema(example = "2026-08-25 09:30:00")]
    pub created_at: String,
    #[schema(example = "2026-08-25 09:30:00")]
    pub updated_at: String,
    pub employee: EmployeeResponse,
}

impl From<LeaveWithEmployee> for LeaveRecordResponse {
    fn from(r: LeaveWithEmployee) -> Self {
        Self {
            id: r.id,
            employee_id: r.employee_id,
            reason: r.reason,
            start_date: r.start_date.format("%Y-%m-%d").to_string(),
            end_date: r.end_date.format("%Y-%m-%d").to_string(),
            created_at: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            employee: EmployeeResponse {
                id: r.e_id,
                first_name: r.e_first_name,
                last_name: r.e_last_name,
                email: r.e_email,
                phone_number: r.e_phone_number,
                address: r.e_address,
                gender: r.e_gender,
                created_at: r.e_created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                updated_at: r.e_updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        }
    }
}

/// Every read carries the owning employee, so the join is part of the
/// base select and list filters only append a predicate.
const SELECT_JOINED: &str = r#"
SELECT lr.id, lr.employee_id, lr.reason, lr.start_date, lr.end_date,
       lr.created_at, lr.updated_at,
       e.id AS e_id, e.first_name AS e_first_name, e.last_name AS e_last_name,
       e.email AS e_email, e.phone_number AS e_phone_number, e.address AS e_address,
       e.gender AS e_gender, e.created_at AS e_created_at, e.updated_at AS e_updated_at
FROM leave_records lr
JOIN employees e ON e.id = lr.employee_id
"#;

async fn fetch_joined(pool: &SqlitePool, id: i64) -> Result<Option<LeaveWithEmployee>, ApiError> {
    let row = sqlx::query_as::<_, LeaveWithEmployee>(&format!("{SELECT_JOINED} WHERE lr.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Runs the admission rules for a proposed span inside the caller's
/// transaction: loads the target employee's records whose start_date
/// falls in the current wall-clock year, then applies the quota and
/// start-month rules. `exclude_id` is the record being updated.
async fn admit(
    tx: &mut Transaction<'_, Sqlite>,
    input: &LeaveInput,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let (jan1, dec31) = filter::year_window(Local::now().year())
        .ok_or_else(|| ApiError::Internal("current year outside calendar range".to_string()))?;

    let existing = sqlx::query_as::<_, LeaveSpan>(
        r#"
        SELECT id, start_date, end_date
        FROM leave_records
        WHERE employee_id = ? AND start_date BETWEEN ? AND ?
        "#,
    )
    .bind(input.employee_id)
    .bind(jan1)
    .bind(dec31)
    .fetch_all(&mut **tx)
    .await?;

    eligibility::check(&existing, input.start_date, input.end_date, exclude_id)
}

async fn employee_exists(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<bool, ApiError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(found.is_some())
}

/* =========================
List leave records
========================= */
#[utoipa::path(
    get,
    path = "/leave-records",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Leave records, each joined with its employee", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn list_leave_records(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<LeaveQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = LeaveFilter::from_params(query.month.as_deref(), query.year.as_deref());

    let rows: Vec<LeaveWithEmployee> = match filter {
        LeaveFilter::All => {
            sqlx::query_as(&format!("{SELECT_JOINED} ORDER BY lr.id"))
                .fetch_all(pool.get_ref())
                .await?
        }
        LeaveFilter::Month(month) => {
            sqlx::query_as(&format!(
                "{SELECT_JOINED} WHERE CAST(strftime('%m', lr.start_date) AS INTEGER) = ? ORDER BY lr.id"
            ))
            .bind(i64::from(month))
            .fetch_all(pool.get_ref())
            .await?
        }
        LeaveFilter::Year(year) => match filter::year_window(year) {
            Some((first, last)) => {
                sqlx::query_as(&format!(
                    "{SELECT_JOINED} WHERE lr.start_date BETWEEN ? AND ? ORDER BY lr.id"
                ))
                .bind(first)
                .bind(last)
                .fetch_all(pool.get_ref())
                .await?
            }
            None => Vec::new(),
        },
        LeaveFilter::MonthYear { month, year } => match filter::month_window(year, month) {
            Some((first, last)) => {
                sqlx::query_as(&format!(
                    "{SELECT_JOINED} WHERE lr.start_date BETWEEN ? AND ? ORDER BY lr.id"
                ))
                .bind(first)
                .bind(last)
                .fetch_all(pool.get_ref())
                .await?
            }
            None => Vec::new(),
        },
    };

    let records: Vec<LeaveRecordResponse> =
        rows.into_iter().map(LeaveRecordResponse::from).collect();

    Ok(response::ok("Leave records fetched successfully", records))
}

/* =========================
Get leave record by id
========================= */
#[utoipa::path(
    get,
    path = "/leave-records/{id}",
    params(("id", Path, description = "Leave record ID")),
    responses(
        (status = 200, description = "Leave record found", body = LeaveRecordResponse),
        (status = 404, description = "Leave record not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn get_leave_record(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let record = fetch_joined(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::LeaveRecordNotFound)?;

    Ok(response::ok(
        "Leave record fetched successfully",
        LeaveRecordResponse::from(record),
    ))
}

/* =========================
Create leave record
========================= */
#[utoipa::path(
    post,
    path = "/leave-records",
    request_body = CreateLeaveRecord,
    responses(
        (status = 200, description = "Leave record created", body = LeaveRecordResponse),
        (status = 400, description = "Validation failed, invalid range, or a quota/month rule broken", body = Object, example = json!({
            "success": false,
            "message": "Employee can only take up to 12 leave days in a year",
            "error": {
                "code": "ANNUAL_QUOTA_EXCEEDED",
                "details": "Employee can only take up to 12 leave days in a year"
            },
            "statusCode": 400
        })),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn create_leave_record(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateLeaveRecord>,
) -> Result<HttpResponse, ApiError> {
    let input = payload.validate()?;

    // Validate-then-write runs on one transaction; the single-connection
    // pool keeps competing requests from interleaving their reads.
    let mut tx = pool.get_ref().begin().await?;

    if !employee_exists(&mut tx, input.employee_id).await? {
        return Err(ApiError::EmployeeNotFound);
    }

    admit(&mut tx, &input, None).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_records (employee_id, reason, start_date, end_date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(input.employee_id)
    .bind(&input.reason)
    .bind(input.start_date)
    .bind(input.end_date)
    .execute(&mut *tx)
    .await?;

    let id = result.last_insert_rowid();
    tx.commit().await?;

    info!(leave_record_id = id, employee_id = input.employee_id, "Leave record created");

    let record = fetch_joined(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::LeaveRecordNotFound)?;

    Ok(response::ok(
        "Create leave record successfully",
        LeaveRecordResponse::from(record),
    ))
}

/* =========================
Update leave record
========================= */
#[utoipa::path(
    patch,
    path = "/leave-records/{id}",
    params(("id", Path, description = "Leave record ID")),
    request_body = UpdateLeaveRecord,
    responses(
        (status = 200, description = "Leave record updated", body = LeaveRecordResponse),
        (status = 400, description = "Validation failed, invalid range, or a quota/month rule broken"),
        (status = 404, description = "Leave record or target employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn update_leave_record(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateLeaveRecord>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = payload.validate()?;

    let mut tx = pool.get_ref().begin().await?;

    // 1. The record itself
    let existing = sqlx::query_as::<_, LeaveRecord>(
        r#"
        SELECT id, employee_id, reason, start_date, end_date, created_at, updated_at
        FROM leave_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    if existing.is_none() {
        return Err(ApiError::LeaveRecordNotFound);
    }

    // 2. The target employee; the aggregate is computed against it even
    //    when the update moves the record away from its current owner.
    if !employee_exists(&mut tx, input.employee_id).await? {
        return Err(ApiError::EmployeeNotFound);
    }

    // 3. Rules, with the record excluded from its own aggregate
    admit(&mut tx, &input, Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE leave_records
        SET employee_id = ?, reason = ?, start_date = ?, end_date = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(input.employee_id)
    .bind(&input.reason)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(leave_record_id = id, employee_id = input.employee_id, "Leave record updated");

    let record = fetch_joined(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::LeaveRecordNotFound)?;

    Ok(response::ok(
        "Update leave record successfully",
        LeaveRecordResponse::from(record),
    ))
}

/* =========================
Delete leave record
========================= */
#[utoipa::path(
    delete,
    path = "/leave-records/{id}",
    params(("id", Path, description = "Leave record ID")),
    responses(
        (status = 200, description = "Leave record deleted", body = Object, example = json!({
            "success": true,
            "message": "Leave record deleted successfully",
            "statusCode": 200
        })),
        (status = 404, description = "Leave record not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Leave",
    security(("bearer_auth" = []))
)]
pub async fn delete_leave_record(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM leave_records WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::LeaveRecordNotFound);
    }

    info!(leave_record_id = id, "Leave record deleted");

    Ok(response::ok_empty("Leave record deleted successfully"))
}
