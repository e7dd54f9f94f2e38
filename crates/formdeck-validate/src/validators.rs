#![forbid(unsafe_code)]

//! Core validation types and built-in checks.
//!
//! Every built-in carries the message shown next to the offending field, so
//! the same check can surface field-specific wording ("Name is required"
//! vs. "Guest name is required"). Format checks treat an empty value as
//! valid; presence is [`Required`]'s job.

use std::fmt;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// Error code for a missing required value.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Error code for a malformed email address.
pub const ERROR_CODE_EMAIL: &str = "email";
/// Error code for a malformed URL.
pub const ERROR_CODE_URL: &str = "url";
/// Error code for a value that does not parse as a number.
pub const ERROR_CODE_NUMERIC: &str = "numeric";
/// Error code for a number that is not strictly positive.
pub const ERROR_CODE_POSITIVE: &str = "positive";
/// Error code for a value below the minimum length.
pub const ERROR_CODE_MIN_CHARS: &str = "min_chars";
/// Error code for custom rule failures.
pub const ERROR_CODE_CUSTOM: &str = "custom";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation failure with a stable code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable identifier for programmatic handling.
    pub code: &'static str,
    /// Message shown inline next to the field.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value passed.
    #[default]
    Valid,
    /// The value failed with an error.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the result is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` if the result is `Invalid`.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Returns the error if invalid.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Consumes the result, returning the error if invalid.
    #[must_use]
    pub fn into_error(self) -> Option<ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A check applied to a field's string value.
///
/// Validators are chained in declaration order by [`crate::rules::FieldRule`];
/// the first failure wins, matching the `else if` cascades of hand-written
/// form validation.
pub trait Validator: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &str) -> ValidationResult;
}

// ---------------------------------------------------------------------------
// Built-in Validators
// ---------------------------------------------------------------------------

/// Requires a non-empty value (whitespace-only counts as empty).
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    /// Create a `Required` check with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_REQUIRED, &self.message))
        } else {
            ValidationResult::Valid
        }
    }
}

/// Requires a plausible email address: non-space text, `@`, non-space text,
/// `.`, non-space text, anywhere in the value.
///
/// This is deliberately the loose `\S+@\S+\.\S+` heuristic, implemented
/// without a regex engine.
#[derive(Debug, Clone)]
pub struct EmailFormat {
    message: String,
}

impl EmailFormat {
    /// Create an `EmailFormat` check with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for EmailFormat {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || matches_email(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_EMAIL, &self.message))
        }
    }
}

/// Requires an `http(s)://` URL with a dotted host: the anchored
/// `^https?://\S+\.\S+` heuristic, without a regex engine.
#[derive(Debug, Clone)]
pub struct UrlFormat {
    message: String,
}

impl UrlFormat {
    /// Create a `UrlFormat` check with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for UrlFormat {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || matches_url(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_URL, &self.message))
        }
    }
}

/// Requires the value to parse as a number.
#[derive(Debug, Clone)]
pub struct Numeric {
    message: String,
}

impl Numeric {
    /// Create a `Numeric` check with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for Numeric {
    fn validate(&self, value: &str) -> ValidationResult {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_NUMERIC, &self.message))
        }
    }
}

/// Requires the value to parse as a number strictly greater than zero.
#[derive(Debug, Clone)]
pub struct PositiveNumber {
    message: String,
}

impl PositiveNumber {
    /// Create a `PositiveNumber` check with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for PositiveNumber {
    fn validate(&self, value: &str) -> ValidationResult {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return ValidationResult::Valid;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n > 0.0 => ValidationResult::Valid,
            _ => ValidationResult::Invalid(ValidationError::new(
                ERROR_CODE_POSITIVE,
                &self.message,
            )),
        }
    }
}

/// Requires at least `min` characters. Unlike the format checks, an empty
/// value fails: the fields using this rule fold "required" and "too short"
/// into a single message.
#[derive(Debug, Clone)]
pub struct MinChars {
    min: usize,
    message: String,
}

impl MinChars {
    /// Create a `MinChars` check with the given message.
    #[must_use]
    pub fn new(min: usize, message: impl Into<String>) -> Self {
        Self {
            min,
            message: message.into(),
        }
    }
}

impl Validator for MinChars {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.chars().count() < self.min {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_MIN_CHARS, &self.message))
        } else {
            ValidationResult::Valid
        }
    }
}

// ---------------------------------------------------------------------------
// Format helpers
// ---------------------------------------------------------------------------

/// `\S+@\S+\.\S+`, unanchored: somewhere in the value there is an `@` with a
/// non-space character before it and a dotted non-space run after it.
fn matches_email(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    for (at, &c) in chars.iter().enumerate() {
        if c != '@' {
            continue;
        }
        if at == 0 || chars[at - 1].is_whitespace() {
            continue;
        }
        let mut end = at + 1;
        while end < chars.len() && !chars[end].is_whitespace() {
            end += 1;
        }
        // Need at least one character between '@' and '.', and one after
        // the '.', all within the non-space run.
        for dot in at + 2..end {
            if chars[dot] == '.' && dot + 1 < end {
                return true;
            }
        }
    }
    false
}

/// `^https?://\S+\.\S+`, anchored at the start of the value.
fn matches_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let run: Vec<char> = rest.chars().take_while(|c| !c.is_whitespace()).collect();
    run.iter()
        .enumerate()
        .any(|(i, &c)| c == '.' && i >= 1 && i + 1 < run.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -- Required --

    #[test]
    fn required_empty_fails() {
        let v = Required::new("Name is required");
        let err = v.validate("").into_error().expect("should fail");
        assert_eq!(err.code, ERROR_CODE_REQUIRED);
        assert_eq!(err.message, "Name is required");
    }

    #[test]
    fn required_whitespace_only_fails() {
        let v = Required::new("x");
        assert!(v.validate("   ").is_invalid());
        assert!(v.validate("\t\n").is_invalid());
    }

    #[test]
    fn required_non_empty_passes() {
        let v = Required::new("x");
        assert!(v.validate("Ada").is_valid());
    }

    // -- EmailFormat --

    #[test]
    fn email_valid() {
        let v = EmailFormat::new("Email is invalid");
        assert!(v.validate("user@example.com").is_valid());
        assert!(v.validate("user.name@example.co.uk").is_valid());
        assert!(v.validate("user+tag@example.org").is_valid());
        // Unanchored: surrounding text does not matter.
        assert!(v.validate("  user@example.com  ").is_valid());
    }

    #[test]
    fn email_invalid() {
        let v = EmailFormat::new("Email is invalid");
        assert!(v.validate("not-an-email").is_invalid());
        assert!(v.validate("@example.com").is_invalid());
        assert!(v.validate("user@").is_invalid());
        assert!(v.validate("user@example").is_invalid());
        assert!(v.validate("user@.com").is_invalid());
        assert!(v.validate("user@example.").is_invalid());
        assert!(v.validate("user@ example.com").is_invalid());
    }

    #[test]
    fn email_empty_is_valid() {
        // Presence is Required's job.
        let v = EmailFormat::new("x");
        assert!(v.validate("").is_valid());
    }

    // -- UrlFormat --

    #[test]
    fn url_valid() {
        let v = UrlFormat::new("Portfolio URL is invalid");
        assert!(v.validate("http://example.com").is_valid());
        assert!(v.validate("https://a.bc").is_valid());
        assert!(v.validate("https://example.com/path?q=1").is_valid());
    }

    #[test]
    fn url_invalid() {
        let v = UrlFormat::new("Portfolio URL is invalid");
        assert!(v.validate("notaurl").is_invalid());
        assert!(v.validate("ftp://example.com").is_invalid());
        assert!(v.validate("https://").is_invalid());
        assert!(v.validate("https://nodot").is_invalid());
        assert!(v.validate("https://.com").is_invalid());
        assert!(v.validate("https://trailing.").is_invalid());
        // Anchored: a valid URL later in the value does not count.
        assert!(v.validate("see https://a.bc").is_invalid());
    }

    #[test]
    fn url_empty_is_valid() {
        let v = UrlFormat::new("x");
        assert!(v.validate("").is_valid());
    }

    // -- Numeric --

    #[test]
    fn numeric_accepts_numbers() {
        let v = Numeric::new("Phone Number must be a valid number");
        assert!(v.validate("5551234").is_valid());
        assert!(v.validate(" 42 ").is_valid());
        assert!(v.validate("3.25").is_valid());
    }

    #[test]
    fn numeric_rejects_text() {
        let v = Numeric::new("Phone Number must be a valid number");
        assert!(v.validate("555-1234").is_invalid());
        assert!(v.validate("abc").is_invalid());
    }

    // -- PositiveNumber --

    #[test]
    fn positive_number_boundary() {
        let v = PositiveNumber::new("Age must be a number greater than 0");
        assert!(v.validate("1").is_valid());
        assert!(v.validate("0.5").is_valid());
        assert!(v.validate("0").is_invalid());
        assert!(v.validate("-3").is_invalid());
        assert!(v.validate("twelve").is_invalid());
    }

    #[test]
    fn positive_number_empty_is_valid() {
        let v = PositiveNumber::new("x");
        assert!(v.validate("").is_valid());
    }

    // -- MinChars --

    #[test]
    fn min_chars_boundary() {
        let v = MinChars::new(50, "Feedback is required and must be at least 50 characters");
        assert!(v.validate(&"x".repeat(49)).is_invalid());
        assert!(v.validate(&"x".repeat(50)).is_valid());
    }

    #[test]
    fn min_chars_empty_fails() {
        let v = MinChars::new(50, "x");
        assert!(v.validate("").is_invalid());
    }

    #[test]
    fn min_chars_counts_characters_not_bytes() {
        let v = MinChars::new(4, "x");
        assert!(v.validate("café").is_valid());
        assert!(v.validate("caf").is_invalid());
    }

    // -- Properties --

    proptest! {
        #[test]
        fn email_check_never_panics(s in "\\PC*") {
            let _ = EmailFormat::new("x").validate(&s);
        }

        #[test]
        fn url_check_never_panics(s in "\\PC*") {
            let _ = UrlFormat::new("x").validate(&s);
        }

        #[test]
        fn simple_addresses_pass(local in "[a-z]{1,8}", host in "[a-z]{1,8}", tld in "[a-z]{2,4}") {
            let addr = format!("{local}@{host}.{tld}");
            prop_assert!(EmailFormat::new("x").validate(&addr).is_valid());
        }
    }
}
