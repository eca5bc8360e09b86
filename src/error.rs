use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

/// One offending request field plus every rule it broke. Validation
/// failures list all such fields at once rather than the first hit.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "first_name")]
    pub field: String,
    #[schema(example = json!(["first_name should not be empty"]))]
    pub errors: Vec<String>,
}

impl FieldError {
    pub fn new(field: &str, errors: Vec<String>) -> Self {
        Self {
            field: field.to_string(),
            errors,
        }
    }
}

/// Every failure the API surfaces. Each variant maps to one HTTP status
/// and one stable error code inside the response envelope.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Validation failed")]
    Validation(Vec<FieldError>),

    #[display(fmt = "Invalid credentials")]
    InvalidCredentials,

    #[display(fmt = "Authorization token is missing")]
    TokenMissing,
    #[display(fmt = "Token has expired")]
    TokenExpired,
    #[display(fmt = "Invalid token")]
    TokenInvalid,
    #[display(fmt = "Token has been blacklisted")]
    TokenBlacklisted,

    #[display(fmt = "Admin not found")]
    AdminNotFound,
    #[display(fmt = "User not found")]
    UserNotFound,
    #[display(fmt = "Employee not found")]
    EmployeeNotFound,
    #[display(fmt = "Leave record not found")]
    LeaveRecordNotFound,

    #[display(fmt = "Email already exists")]
    EmailConflict,

    #[display(fmt = "end_date cannot be before start_date")]
    InvalidRange,
    #[display(fmt = "Employee can only take up to 12 leave days in a year")]
    AnnualQuotaExceeded,
    #[display(fmt = "Employee can only take 1 leave day in the same month")]
    MonthlyLimitExceeded,

    #[display(fmt = "Internal server error")]
    Database(sqlx::Error),
    #[display(fmt = "Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::TokenMissing => "TOKEN_MISSING",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::TokenInvalid => "INVALID_TOKEN",
            ApiError::TokenBlacklisted => "TOKEN_BLACKLISTED",
            ApiError::AdminNotFound => "ADMIN_NOT_FOUND",
            ApiError::UserNotFound => "USER_NOT_FOUND",
            ApiError::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            ApiError::LeaveRecordNotFound => "LEAVE_RECORD_NOT_FOUND",
            ApiError::EmailConflict => "EMAIL_CONFLICT",
            ApiError::InvalidRange => "INVALID_RANGE",
            ApiError::AnnualQuotaExceeded => "ANNUAL_QUOTA_EXCEEDED",
            ApiError::MonthlyLimitExceeded => "MONTHLY_LIMIT_EXCEEDED",
            ApiError::Database(_) | ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidCredentials
            | ApiError::InvalidRange
            | ApiError::AnnualQuotaExceeded
            | ApiError::MonthlyLimitExceeded => StatusCode::BAD_REQUEST,

            ApiError::TokenMissing
            | ApiError::TokenExpired
            | ApiError::TokenInvalid
            | ApiError::TokenBlacklisted => StatusCode::UNAUTHORIZED,

            ApiError::AdminNotFound
            | ApiError::UserNotFound
            | ApiError::EmployeeNotFound
            | ApiError::LeaveRecordNotFound => StatusCode::NOT_FOUND,

            ApiError::EmailConflict => StatusCode::UNPROCESSABLE_ENTITY,

            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database error");
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
            }
            _ => {}
        }

        let body = match self {
            ApiError::Validation(fields) => json!({
                "success": false,
                "message": "Validation failed",
                "error": fields,
                "statusCode": status.as_u16(),
            }),
            _ => json!({
                "success": false,
                "message": self.to_string(),
                "error": {
                    "code": self.code(),
                    "details": self.to_string(),
                },
                "statusCode": status.as_u16(),
            }),
        };

        HttpResponse::build(status).json(body)
    }
}

impl std::error::Error for ApiError {}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}
