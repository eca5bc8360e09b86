use chrono::NaiveDate;

/// How a leave-record listing is narrowed. Each variant maps onto its
/// own prepared statement with typed binds; request input never reaches
/// the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveFilter {
    All,
    /// Start-month match, any year.
    Month(u32),
    /// Start date inside one calendar year.
    Year(i32),
    /// Start date inside one calendar month of one year.
    MonthYear { month: u32, year: i32 },
}

impl LeaveFilter {
    /// Builds the filter from raw query params. Blank params count as
    /// absent; non-numeric values become a month/year no real record can
    /// carry, so they match nothing rather than fail.
    pub fn from_params(month: Option<&str>, year: Option<&str>) -> Self {
        let month = month.map(str::trim).filter(|s| !s.is_empty());
        let year = year.map(str::trim).filter(|s| !s.is_empty());

        match (month, year) {
            (None, None) => LeaveFilter::All,
            (Some(m), None) => LeaveFilter::Month(parse_month(m)),
            (None, Some(y)) => LeaveFilter::Year(parse_year(y)),
            (Some(m), Some(y)) => LeaveFilter::MonthYear {
                month: parse_month(m),
                year: parse_year(y),
            },
        }
    }
}

fn parse_month(raw: &str) -> u32 {
    raw.parse().unwrap_or(0)
}

fn parse_year(raw: &str) -> i32 {
    raw.parse().unwrap_or(0)
}

/// [Jan 1, Dec 31] of a year. None once the year leaves chrono's range.
pub fn year_window(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// [first, last] day of one calendar month. None for impossible input,
/// which listing turns into an empty result.
pub fn month_window(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}
