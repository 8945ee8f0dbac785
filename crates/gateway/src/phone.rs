//! Sender phone-number normalization (Mexican numbering plan).
//!
//! Transports deliver the same subscriber as `3311296199`, `+52 331 129 6199`,
//! `5213311296199` (the pre-2019 mobile `1` infix) and so on. All of them map to
//! one [`PhoneKey`]: `52` followed by the 10-digit national number. The key is
//! the only thing customer lookups accept.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Country calling code for Mexico.
const COUNTRY_CODE: &str = "52";

/// Length of a canonical key: country code plus the 10-digit national number.
pub const PHONE_KEY_LEN: usize = 12;

/// Why an input could not be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    /// Empty input, wrong digit count, or a prefix that does not fit the length.
    #[error("invalid phone format: {0}")]
    InvalidPhoneFormat(&'static str),
}

/// Canonical phone key: exactly 12 ASCII digits starting with `52`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneKey(String);

impl PhoneKey {
    /// The 12-digit key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneKey {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

impl From<PhoneKey> for String {
    fn from(key: PhoneKey) -> Self {
        key.0
    }
}

/// Normalize free-form sender text into a [`PhoneKey`].
///
/// Returns `None` (after a debug log) when the input cannot be mapped.
pub fn normalize(raw: &str) -> Option<PhoneKey> {
    match parse(raw) {
        Ok(key) => Some(key),
        Err(e) => {
            debug!(error = %e, input_len = raw.len(), "sender phone rejected");
            None
        }
    }
}

/// Normalize free-form sender text into a [`PhoneKey`], keeping the reason on failure.
///
/// # Errors
///
/// Returns [`PhoneError::InvalidPhoneFormat`] for empty input, fewer than 10 or
/// more than 13 digits, or a prefix that does not match the digit count.
pub fn parse(raw: &str) -> Result<PhoneKey, PhoneError> {
    if raw.trim().is_empty() {
        return Err(PhoneError::InvalidPhoneFormat("empty"));
    }

    let digits = strip(raw);
    let digits = digits.strip_prefix('+').unwrap_or(&digits);

    let canonical = match digits.len() {
        10 => format!("{COUNTRY_CODE}{digits}"),
        11 => match digits.strip_prefix('1') {
            Some(national) => format!("{COUNTRY_CODE}{national}"),
            None => return Err(PhoneError::InvalidPhoneFormat("11 digits must start with 1")),
        },
        12 => {
            if !digits.starts_with(COUNTRY_CODE) {
                return Err(PhoneError::InvalidPhoneFormat("12 digits must start with 52"));
            }
            digits.to_owned()
        }
        13 => match digits.strip_prefix("521") {
            Some(national) => format!("{COUNTRY_CODE}{national}"),
            None => return Err(PhoneError::InvalidPhoneFormat("13 digits must start with 521")),
        },
        _ => return Err(PhoneError::InvalidPhoneFormat("expected 10 to 13 digits")),
    };

    if !is_canonical(&canonical) {
        return Err(PhoneError::InvalidPhoneFormat("not a canonical key"));
    }
    Ok(PhoneKey(canonical))
}

/// Keep ASCII digits plus a `+` only if it precedes every kept digit.
fn strip(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && out.is_empty()) {
            out.push(c);
        }
    }
    out
}

fn is_canonical(candidate: &str) -> bool {
    candidate.len() == PHONE_KEY_LEN
        && candidate.starts_with(COUNTRY_CODE)
        && candidate.bytes().all(|b| b.is_ascii_digit())
}
