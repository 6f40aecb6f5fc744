//! Registration form checks.
//!
//! These run in front ends before anything reaches the repository. The
//! repository itself accepts any payload that passes its uniqueness rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::farmer::NewFarmer;

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{4,}$").unwrap());

/// A rejected registration field and the message to show next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Coarse password strength rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// At least 8 characters with at least one letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Scores one point each for length, lowercase, uppercase, digit and symbol.
pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    match checks.iter().filter(|passed| **passed).count() {
        0..=2 => PasswordStrength::Weak,
        3 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

pub fn is_valid_pin(pin: &str) -> bool {
    PIN_RE.is_match(pin)
}

/// Checks a registration payload the way the sign-up form does.
///
/// Returns every failing field; an empty vector means the payload is fine.
pub fn validate_registration(data: &NewFarmer, confirm_password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let name = data.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() < 2 {
        errors.push(FieldError::new("name", "Min 2 characters"));
    }

    if data.mobile.trim().is_empty() {
        errors.push(FieldError::new("mobile", "Required"));
    } else if !is_valid_mobile(data.mobile.trim()) {
        errors.push(FieldError::new("mobile", "Enter valid 10-digit mobile"));
    }

    let email = data.email.trim();
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "Enter valid email"));
    }

    if data.pin.trim().is_empty() {
        errors.push(FieldError::new("pin", "Required"));
    } else if !is_valid_pin(data.pin.trim()) {
        errors.push(FieldError::new("pin", "Enter valid 6-digit PIN"));
    }

    if data.username.trim().is_empty() {
        errors.push(FieldError::new("username", "Required"));
    } else if !USERNAME_RE.is_match(data.username.trim()) {
        errors.push(FieldError::new("username", "4-20 alphanumeric chars"));
    }

    if data.password.is_empty() {
        errors.push(FieldError::new("password", "Required"));
    } else if !is_valid_password(&data.password) {
        errors.push(FieldError::new(
            "password",
            "8+ chars with letters AND numbers",
        ));
    }

    if data.password != confirm_password {
        errors.push(FieldError::new("confirm_password", "Passwords do not match"));
    }

    errors
}
