use chrono::{Datelike, NaiveDate};

use crate::error::ApiError;

/// Leave days an employee may take per calendar year, endpoints inclusive.
pub const ANNUAL_QUOTA_DAYS: i64 = 12;

/// The slice of a stored leave row that the admission check reads.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaveSpan {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Calendar days covered by a span, both endpoints counted:
/// Jan 3 to Jan 5 is three days.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Decides whether a proposed span may be written, given the records
/// already on file for the quota year. `exclude_id` removes the record
/// being updated from the aggregate so it does not count against itself.
///
/// Rules run in a fixed order: range shape, then the annual quota, then
/// the one-start-per-month rule. A request that breaks both limits
/// reports the quota.
pub fn check(
    existing: &[LeaveSpan],
    start_date: NaiveDate,
    end_date: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    if end_date < start_date {
        return Err(ApiError::InvalidRange);
    }

    let requested_days = inclusive_days(start_date, end_date);

    let used_days: i64 = existing
        .iter()
        .filter(|r| Some(r.id) != exclude_id)
        .map(|r| inclusive_days(r.start_date, r.end_date))
        .sum();

    if used_days + requested_days > ANNUAL_QUOTA_DAYS {
        return Err(ApiError::AnnualQuotaExceeded);
    }

    let month_taken = existing
        .iter()
        .filter(|r| Some(r.id) != exclude_id)
        .any(|r| r.start_date.month() == start_date.month());

    if month_taken {
        return Err(ApiError::MonthlyLimitExceeded);
    }

    Ok(())
}
