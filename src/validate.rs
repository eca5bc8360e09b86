use chrono::NaiveDate;

use crate::error::{ApiError, FieldError};
use crate::model::employee::Gender;

/* ========================= Field validation ========================= */

/// Accumulates per-field messages so a response can report every broken
/// field at once. Messages for the same field merge into one entry.
#[derive(Default)]
pub struct FieldErrors {
    items: Vec<FieldError>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: String) {
        if let Some(entry) = self.items.iter_mut().find(|e| e.field == field) {
            entry.errors.push(message);
        } else {
            self.items.push(FieldError::new(field, vec![message]));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.items))
        }
    }
}

/// Required text field. Returns an empty placeholder when invalid; the
/// caller bails out through `into_result` before placeholders are used.
pub fn required_string(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.clone(),
        Some(_) => {
            errors.push(field, format!("{field} should not be empty"));
            String::new()
        }
        None => {
            errors.push(field, format!("{field} must be a string"));
            errors.push(field, format!("{field} should not be empty"));
            String::new()
        }
    }
}

/// Optional text field: absent is fine, present-but-blank is not.
pub fn optional_string(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
) -> Option<String> {
    match value {
        None => None,
        Some(s) if !s.trim().is_empty() => Some(s.clone()),
        Some(_) => {
            errors.push(field, format!("{field} should not be empty"));
            None
        }
    }
}

pub fn required_date(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> NaiveDate {
    match value {
        Some(s) if !s.trim().is_empty() => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                errors.push(field, format!("{field} must be a valid ISO 8601 date string"));
                NaiveDate::MIN
            }
        },
        Some(_) => {
            errors.push(field, format!("{field} should not be empty"));
            NaiveDate::MIN
        }
        None => {
            errors.push(field, format!("{field} must be a valid ISO 8601 date string"));
            errors.push(field, format!("{field} should not be empty"));
            NaiveDate::MIN
        }
    }
}

pub fn optional_date(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
) -> Option<NaiveDate> {
    match value {
        None => None,
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                errors.push(field, format!("{field} must be a valid ISO 8601 date string"));
                None
            }
        },
    }
}

pub fn required_i64(errors: &mut FieldErrors, field: &str, value: &Option<i64>) -> i64 {
    match value {
        Some(n) => *n,
        None => {
            errors.push(
                field,
                format!("{field} must be a number conforming to the specified constraints"),
            );
            errors.push(field, format!("{field} should not be empty"));
            0
        }
    }
}

pub fn required_gender(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> Gender {
    match value {
        Some(s) => match s.parse::<Gender>() {
            Ok(g) => g,
            Err(_) => {
                errors.push(
                    field,
                    format!("{field} must be one of the following values: male, female"),
                );
                Gender::Male
            }
        },
        None => {
            errors.push(
                field,
                format!("{field} must be one of the following values: male, female"),
            );
            errors.push(field, format!("{field} should not be empty"));
            Gender::Male
        }
    }
}

pub fn optional_gender(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
) -> Option<Gender> {
    match value {
        None => None,
        Some(s) => match s.parse::<Gender>() {
            Ok(g) => Some(g),
            Err(_) => {
                errors.push(
                    field,
                    format!("{field} must be one of the following values: male, female"),
                );
                None
            }
        },
    }
}

/// Minimum-length rule, applied after presence has been established.
pub fn min_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    if !value.is_empty() && value.chars().count() < min {
        errors.push(
            field,
            format!("{field} must be longer than or equal to {min} characters"),
        );
    }
}

/// Loose phone shape: an optional leading `+`, then digits with the usual
/// separators, at least seven digits in total.
pub fn phone_shape(errors: &mut FieldErrors, field: &str, value: &str) {
    let trimmed = value.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = rest.chars().filter(|c| c.is_ascii_digit()).count();
    let well_formed = rest
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));

    if !trimmed.is_empty() && (!well_formed || digits < 7) {
        errors.push(field, format!("{field} must be a valid phone number"));
    }
}
