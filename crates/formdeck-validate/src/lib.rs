#![forbid(unsafe_code)]

//! Field validation for the formdeck forms.
//!
//! Two layers:
//! - [`validators`]: the `Validator` trait and the built-in checks
//!   (required, email format, URL format, numeric, positive number,
//!   minimum length), each carrying its own per-field error message.
//! - [`rules`]: a declarative rule table (`RuleSet`) mapping field keys to
//!   visibility predicates and validator chains, evaluated wholesale into
//!   an [`rules::Errors`] record.
//!
//! Validation is synchronous and allocation-light; a `RuleSet` is built
//! once per form and evaluated on every submit attempt.

pub mod rules;
pub mod validators;

pub use rules::{Errors, FieldRule, RuleSet};
pub use validators::{
    EmailFormat, MinChars, Numeric, PositiveNumber, Required, UrlFormat, ValidationError,
    ValidationResult, Validator,
};
