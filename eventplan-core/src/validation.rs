//! Input checks run before anything reaches the store.
//!
//! The store never validates; callers use these to reject a submission
//! up front. The three format helpers are total and never fail.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::event::Guest;

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A single `@` with non-whitespace on both sides and a `.` after it.
pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

/// Brazilian numbers: area code plus an 8 or 9 digit number.
pub fn is_valid_phone(phone: &str) -> bool {
    let n = digits(phone).len();
    n == 10 || n == 11
}

/// Format as `(DD) DDDDD-DDDD` or `(DD) DDDD-DDDD`.
/// Anything without 10 or 11 digits comes back unchanged.
pub fn format_phone(phone: &str) -> String {
    let d = digits(phone);

    match d.len() {
        11 => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
        10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => phone.to_string(),
    }
}

/// Trimmed value of a required field, or an error naming the field.
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_string())
}

/// Check one guest submission and build the pending guest it describes.
pub fn validate_guest(name: &str, email: &str, phone: &str) -> Result<Guest, ValidationError> {
    let name = require("Name", name)?;

    let email = require("Email", email)?;
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail(email));
    }

    let phone = require("Phone", phone)?;
    if !is_valid_phone(&phone) {
        return Err(ValidationError::InvalidPhone(phone));
    }

    Ok(Guest::new(&name, &email, &format_phone(&phone)))
}

/// Parse `Name, Email, Phone` lines (blank lines skipped).
///
/// The batch is all-or-nothing: the first bad line rejects everything,
/// and a batch with no guests at all is rejected too.
pub fn parse_bulk_guests(text: &str) -> Result<Vec<Guest>, ValidationError> {
    let guests = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let mut fields = line.split(',').map(str::trim);
            let name = fields.next().unwrap_or_default();
            let email = fields.next().unwrap_or_default();
            let phone = fields.next().unwrap_or_default();

            validate_guest(name, email, phone).map_err(|e| ValidationError::BulkLine {
                line: idx + 1,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if guests.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    Ok(guests)
}

/// Parse a price typed by a user. Accepts `12.50` and `12,50`.
pub fn parse_price(input: &str) -> Result<f64, ValidationError> {
    let normalized = input.trim().replacen(',', ".", 1);

    match normalized.parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(ValidationError::InvalidPrice(input.to_string())),
    }
}
