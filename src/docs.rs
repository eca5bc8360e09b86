use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::admin::{AdminResponse, CreateAdmin, UpdateAdmin};
use crate::api::employee::{CreateEmployee, EmployeeResponse, UpdateEmployee};
use crate::api::leave_record::{CreateLeaveRecord, LeaveRecordResponse, UpdateLeaveRecord};
use crate::auth::handlers::{LoginData, LoginRequest};
use crate::error::FieldError;
use crate::model::employee::Gender;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Back-Office API",
        version = "0.1.0",
        description = r#"
Back-office API for HR administrators.

- **Auth**: token login, logout with server-side revocation, session profile
- **Admins**: manage the administrator accounts themselves
- **Employees**: the employee directory, unique email per employee
- **Leave**: leave records gated by a 12-day annual quota and a
  one-start-per-calendar-month rule

All endpoints answer with the same envelope:
`{ "success": bool, "message": string, "data" | "error": ..., "statusCode": number }`.
Every endpoint except login requires `Authorization: Bearer <token>`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::sessions,

        crate::api::admin::list_admins,
        crate::api::admin::get_admin,
        crate::api::admin::create_admin,
        crate::api::admin::update_admin,
        crate::api::admin::delete_admin,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::leave_record::list_leave_records,
        crate::api::leave_record::get_leave_record,
        crate::api::leave_record::create_leave_record,
        crate::api::leave_record::update_leave_record,
        crate::api::leave_record::delete_leave_record
    ),
    components(
        schemas(
            LoginRequest,
            LoginData,
            CreateAdmin,
            UpdateAdmin,
            AdminResponse,
            CreateEmployee,
            UpdateEmployee,
            EmployeeResponse,
            CreateLeaveRecord,
            UpdateLeaveRecord,
            LeaveRecordResponse,
            FieldError,
            Gender
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, logout and session APIs"),
        (name = "Admin", description = "Administrator account APIs"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Leave", description = "Leave record APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
