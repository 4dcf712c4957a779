//! Field formatters for free-text form input.
//!
//! Handles:
//! - Phone masking (01012345678 → 010-1234-5678)
//! - Resident-number masking and gender inference
//! - BMI from height/weight
//! - Date labels and measurement date-time parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::models::Gender;

/// Maximum digits kept in a phone number.
pub const PHONE_MAX_DIGITS: usize = 11;

/// Maximum digits kept in a resident-registration number.
pub const RESIDENT_NUMBER_MAX_DIGITS: usize = 13;

/// Strip everything except ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask a phone number as `NNN-NNNN-NNNN`.
///
/// Partial input is masked progressively; digits beyond the eleventh are dropped.
pub fn format_phone_number(value: &str) -> String {
    let digits: String = digits_only(value).chars().take(PHONE_MAX_DIGITS).collect();
    match digits.len() {
        0..=3 => digits,
        4..=7 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
    }
}

/// Mask a resident-registration number as `NNNNNN-NNNNNNN`.
pub fn format_resident_number(value: &str) -> String {
    let digits: String = digits_only(value)
        .chars()
        .take(RESIDENT_NUMBER_MAX_DIGITS)
        .collect();
    if digits.len() <= 6 {
        digits
    } else {
        format!("{}-{}", &digits[..6], &digits[6..])
    }
}

/// Infer gender from the first digit of the resident number's second segment.
///
/// 1, 3, 5 → male; 2, 4, 6 → female; anything else → unset.
pub fn gender_from_resident_number(value: &str) -> Option<Gender> {
    let formatted = format_resident_number(value);
    let second = formatted.split('-').nth(1)?;
    match second.chars().next()? {
        '1' | '3' | '5' => Some(Gender::Male),
        '2' | '4' | '6' => Some(Gender::Female),
        _ => None,
    }
}

/// Round to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute BMI = weight / (height/100)², rounded to one decimal.
///
/// Returns `None` unless both inputs are present, finite and positive.
pub fn calculate_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let (height, weight) = (height_cm?, weight_kg?);
    if !(height.is_finite() && weight.is_finite()) || height <= 0.0 || weight <= 0.0 {
        return None;
    }
    let meters = height / 100.0;
    Some(round_one_decimal(weight / (meters * meters)))
}

/// Leading decimal number of a free-text value (`"72회"` → 72, `"120mmHg"` → 120).
///
/// Reads an optional sign, digits with an optional fraction and an optional
/// exponent; `None` when the text does not start with a number.
pub fn leading_float(value: &str) -> Option<f64> {
    let text = value.trim();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let int_start = end;
    end = digits_from(end);
    let mut has_digits = end > int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Table label for a timestamp: `YYYY/MM/DD/HH`.
pub fn format_date_label<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%Y/%m/%d/%H").to_string()
}

/// Parse a measurement-device date-time in `M/D/YY H:mm` form.
///
/// Two-digit years are read as 2000+YY; four-digit years are taken as-is.
/// Seconds (`H:mm:ss`) are accepted and ignored when absent.
pub fn parse_measurement_datetime(value: &str) -> Option<NaiveDateTime> {
    let mut parts = value.split_whitespace();
    let date = parts.next()?;
    let time = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let mut date_parts = date.split('/');
    let month: u32 = parse_component(date_parts.next()?)?;
    let day: u32 = parse_component(date_parts.next()?)?;
    let year_text = date_parts.next()?;
    if date_parts.next().is_some() {
        return None;
    }
    let year: i32 = match year_text.len() {
        1 | 2 => 2000 + parse_component::<i32>(year_text)?,
        4 => parse_component(year_text)?,
        _ => return None,
    };

    let mut time_parts = time.split(':');
    let hour: u32 = parse_component(time_parts.next()?)?;
    let minute_text = time_parts.next()?;
    if minute_text.len() != 2 {
        return None;
    }
    let minute: u32 = parse_component(minute_text)?;
    let second: u32 = match time_parts.next() {
        Some(s) => parse_component(s)?,
        None => 0,
    };
    if time_parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn parse_component<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
