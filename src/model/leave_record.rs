use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::employee::Gender;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRecord {
    pub id: i64,
    pub employee_id: i64,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Leave row joined with its employee. The employee columns come back
/// aliased with an `e_` prefix so the row stays flat for sqlx.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaveWithEmployee {
    pub id: i64,
    pub employee_id: i64,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,

    pub e_id: i64,
    pub e_first_name: String,
    pub e_last_name: String,
    pub e_email: String,
    pub e_phone_number: String,
    pub e_address: String,
    pub e_gender: Gender,
    pub e_created_at: NaiveDateTime,
    pub e_updated_at: NaiveDateTime,
}
