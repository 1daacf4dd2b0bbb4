//! Input checks shared by the handlers. Each returns the value in the shape
//! the database wants, or a `BadRequest` with a message fit for the client.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::AppError;

pub const MAX_QUANTITY: i32 = 999_999;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+251|0)[0-9]{9}$").expect("phone pattern is valid")
});

fn bad(msg: &str) -> AppError {
    AppError::BadRequest(msg.to_string())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Ethiopian format, `+251XXXXXXXXX` or `0XXXXXXXXX`; whitespace is ignored.
/// Returns the number with whitespace removed.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact).then_some(compact)
}

/// Trimmed text, or `None` when missing or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Stock quantity: a whole number in `0..=999999`. Accepts JSON numbers or
/// numeric strings, as sent by HTML forms.
pub fn parse_quantity(value: Option<&Value>) -> Result<i32, AppError> {
    let number = match value {
        None | Some(Value::Null) => return Err(bad("Quantity is required")),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(bad("Quantity is required")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| bad("Quantity must be a valid number"))?,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| bad("Quantity must be a valid number"))?,
        Some(_) => return Err(bad("Quantity must be a valid number")),
    };

    if !number.is_finite() {
        return Err(bad("Quantity must be a valid number"));
    }
    if number < 0.0 {
        return Err(bad("Quantity cannot be negative"));
    }
    if number > f64::from(MAX_QUANTITY) {
        return Err(bad("Quantity cannot exceed 999,999 units"));
    }
    if number.fract() != 0.0 {
        return Err(bad("Quantity must be a whole number"));
    }

    Ok(number as i32)
}

/// Unit price: positive, at most 999999.99, at most two decimal places.
pub fn parse_price(value: Option<&Value>) -> Result<Decimal, AppError> {
    let text = match value {
        None | Some(Value::Null) => return Err(bad("Price is required")),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(bad("Price is required")),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(bad("Price must be a valid number")),
    };

    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| bad("Price must be a valid number"))?;

    if price < Decimal::ZERO {
        return Err(bad("Price cannot be negative"));
    }
    if price.is_zero() {
        return Err(bad("Price must be greater than zero"));
    }
    if price > Decimal::new(99_999_999, 2) {
        return Err(bad("Price cannot exceed 999,999.99 ETB"));
    }
    if price.normalize().scale() > 2 {
        return Err(bad("Price can have at most 2 decimal places"));
    }

    Ok(price)
}

pub fn parse_rating(rating: Option<i64>) -> Result<i32, AppError> {
    match rating {
        None => Err(bad("Missing required fields: pharmacy_id, rating, comment")),
        Some(r @ 1..=5) => Ok(r as i32),
        Some(_) => Err(bad("Rating must be between 1 and 5")),
    }
}
