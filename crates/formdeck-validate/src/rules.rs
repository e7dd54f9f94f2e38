#![forbid(unsafe_code)]

//! Declarative field rules.
//!
//! A [`RuleSet`] is a table of [`FieldRule`]s: field key, visibility
//! predicate, and an ordered validator chain (or a custom check for rules
//! that span more than one value, like a checkbox group). Evaluating the
//! set recomputes the whole [`Errors`] record in one pass; hidden fields
//! are skipped entirely, so conditional fields stop being required the
//! moment their selector hides them.
//!
//! The accessors are plain `fn` pointers: rules describe state, they do not
//! capture it, which lets a `RuleSet` live in a `static`.

use std::collections::BTreeMap;

use crate::validators::{
    EmailFormat, MinChars, Numeric, PositiveNumber, Required, UrlFormat, ValidationError,
    Validator,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Per-field error record: field key to human-readable message.
///
/// Recomputed wholesale by [`RuleSet::evaluate`]; individual entries are
/// cleared optimistically when their field changes. Between those two
/// points the record and the field values are independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    map: BTreeMap<&'static str, String>,
}

impl Errors {
    /// An empty error record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for a field.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.map.insert(field, message.into());
    }

    /// The message for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.map.get(field).map(String::as_str)
    }

    /// Clear the message for a single field (optimistic clear on change).
    pub fn clear(&mut self, field: &str) {
        self.map.remove(field);
    }

    /// Whether a field currently has an error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    /// `true` if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Iterate over `(field, message)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.map.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// FieldRule
// ---------------------------------------------------------------------------

type VisibleFn<S> = fn(&S) -> bool;
type ValueFn<S> = fn(&S) -> &str;
type CustomFn<S> = fn(&S) -> Option<ValidationError>;

enum RuleKind<S> {
    /// A string-valued field with a validator chain.
    Value {
        value: ValueFn<S>,
        checks: Vec<Box<dyn Validator>>,
    },
    /// An arbitrary check over the whole form state.
    Custom(CustomFn<S>),
}

/// A single field's validation rule.
pub struct FieldRule<S> {
    field: &'static str,
    visible: Option<VisibleFn<S>>,
    kind: RuleKind<S>,
}

impl<S> FieldRule<S> {
    /// Rule for a string-valued field; chain checks with the builder
    /// methods below.
    #[must_use]
    pub fn value(field: &'static str, value: ValueFn<S>) -> Self {
        Self {
            field,
            visible: None,
            kind: RuleKind::Value {
                value,
                checks: Vec::new(),
            },
        }
    }

    /// Rule evaluated by an arbitrary function, for checks that are not a
    /// single string field (e.g. "at least one skill selected").
    #[must_use]
    pub fn custom(field: &'static str, check: CustomFn<S>) -> Self {
        Self {
            field,
            visible: None,
            kind: RuleKind::Custom(check),
        }
    }

    /// Only evaluate this rule while the predicate holds. Hidden fields
    /// produce no errors regardless of their content.
    #[must_use]
    pub fn visible_when(mut self, visible: VisibleFn<S>) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Append a check to the chain. No-op for custom rules.
    #[must_use]
    pub fn check(mut self, validator: impl Validator + 'static) -> Self {
        if let RuleKind::Value { checks, .. } = &mut self.kind {
            checks.push(Box::new(validator));
        } else {
            debug_assert!(false, "check() on a custom rule");
        }
        self
    }

    /// Require a non-empty value.
    #[must_use]
    pub fn required(self, message: &str) -> Self {
        self.check(Required::new(message))
    }

    /// Require a plausible email address.
    #[must_use]
    pub fn email(self, message: &str) -> Self {
        self.check(EmailFormat::new(message))
    }

    /// Require an `http(s)://` URL.
    #[must_use]
    pub fn url(self, message: &str) -> Self {
        self.check(UrlFormat::new(message))
    }

    /// Require the value to parse as a number.
    #[must_use]
    pub fn numeric(self, message: &str) -> Self {
        self.check(Numeric::new(message))
    }

    /// Require a number strictly greater than zero.
    #[must_use]
    pub fn positive_number(self, message: &str) -> Self {
        self.check(PositiveNumber::new(message))
    }

    /// Require at least `min` characters.
    #[must_use]
    pub fn min_chars(self, min: usize, message: &str) -> Self {
        self.check(MinChars::new(min, message))
    }

    /// The field key this rule reports under.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    fn evaluate(&self, state: &S) -> Option<ValidationError> {
        if let Some(visible) = self.visible
            && !visible(state)
        {
            return None;
        }
        match &self.kind {
            RuleKind::Value { value, checks } => {
                let v = value(state);
                // First failure wins, like an else-if cascade.
                checks
                    .iter()
                    .find_map(|check| check.validate(v).into_error())
            }
            RuleKind::Custom(check) => check(state),
        }
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// An ordered collection of field rules for one form.
pub struct RuleSet<S> {
    rules: Vec<FieldRule<S>>,
}

impl<S> RuleSet<S> {
    /// Build a rule set from rules in display order.
    #[must_use]
    pub fn new(rules: Vec<FieldRule<S>>) -> Self {
        Self { rules }
    }

    /// Recompute the whole error record for the given state.
    #[must_use]
    pub fn evaluate(&self, state: &S) -> Errors {
        let mut errors = Errors::new();
        for rule in &self.rules {
            if let Some(err) = rule.evaluate(state) {
                errors.insert(rule.field, err.message);
            }
        }
        errors
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` if the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
