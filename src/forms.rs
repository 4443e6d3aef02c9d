//! Field-level parsing for text form input.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use time::{macros::format_description, Date};

use crate::error::{AppError, AppResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn required(field: &str, value: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::validation(format!("{field} is required.")));
    }
    Ok(v.to_string())
}

pub fn number<T: FromStr>(field: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::validation(format!("Invalid {field} value.")))
}

/// `YYYY-MM-DD`
pub fn date(field: &str, value: &str) -> AppResult<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation(format!("Invalid {field}, expected YYYY-MM-DD.")))
}

/// Trimmed, otherwise stored as typed.
pub fn email(value: &str) -> AppResult<String> {
    let v = value.trim().to_string();
    if !is_valid_email(&v) {
        return Err(AppError::validation("Invalid email address."));
    }
    Ok(v)
}
