//! Field-level normalizers shared by the row transformers.
//!
//! Every function here is pure: a raw string in, a canonical string out. The
//! date/time parsers return [`DateFormatError`] so callers can attach the field name.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const TRUTHY_VALUES: [&str; 4] = ["yes", "true", "1", "active"];

/// 7 digits → `555-XXXX`, 10 digits → `(AAA) BBB-CCCC`, anything else is
/// returned trimmed.
pub fn normalize_phone(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        7 => format!("555-{}", &digits[3..]),
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => value.trim().to_string(),
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY_VALUES.contains(&value.as_str())
}

pub fn parse_active_flag(value: &str) -> String {
    let flag = if is_truthy(value) { "Active" } else { "Inactive" };
    flag.to_string()
}

pub fn parse_marketing_opt_in(value: &str) -> String {
    let opt_in = if is_truthy(value) { "Yes" } else { "No" };
    opt_in.to_string()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("year must have exactly four digits")]
    YearDigits,

    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
}

// chrono 的 %Y 接受任意位數年份，這裡要求固定四位數
fn require_four_digit_year(value: &str) -> Result<(), DateFormatError> {
    match value.split_once('-') {
        Some((year, _)) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(DateFormatError::YearDigits),
    }
}

pub fn normalize_date(value: &str) -> Result<String, DateFormatError> {
    let value = value.trim();
    require_four_digit_year(value)?;
    let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT)?;
    Ok(parsed.format(DATE_FORMAT).to_string())
}

pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, DateFormatError> {
    let value = value.trim();
    require_four_digit_year(value)?;
    Ok(NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)?)
}

pub fn normalize_datetime(value: &str) -> Result<String, DateFormatError> {
    Ok(parse_datetime(value)?.format(DATETIME_FORMAT).to_string())
}

pub fn normalize_appointment_status(value: &str) -> String {
    let trimmed = value.trim();

    match trimmed.to_lowercase().as_str() {
        "completed" => "Completed".to_string(),
        "cancelled" => "Cancelled".to_string(),
        "no show" | "noshow" => "No Show".to_string(),
        "scheduled" => "Scheduled".to_string(),
        _ => title_case(trimmed),
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `"o'neil"` becomes `"O'Neil"` and `"mary-jane"` becomes `"Mary-Jane"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
