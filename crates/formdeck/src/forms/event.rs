#![forbid(unsafe_code)]

//! Event registration form.
//!
//! Name, email, age, and an attending-with-guest selector; the guest name
//! field only exists while the selector says Yes, and only then is it
//! required.

use std::sync::OnceLock;

use formdeck_runtime::{KeyCode, KeyEvent, Surface};
use formdeck_validate::{FieldRule, RuleSet, rules::Errors};

use crate::fields::{SelectField, TextField};
use crate::forms::{FormEffect, cycle_focus, draw_select_row, draw_text_row};
use crate::submit::{EventRegistrationRecord, notification_body};

const GUEST_OPTIONS: &[&str] = &["No", "Yes"];

/// The fields of the event form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldId {
    Name,
    Email,
    Age,
    AttendingWithGuest,
    GuestName,
}

impl FieldId {
    /// The error-record key for this field.
    const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::AttendingWithGuest => "attendingWithGuest",
            Self::GuestName => "guestName",
        }
    }
}

/// State of the event registration form.
#[derive(Debug, Clone)]
pub struct EventRegistrationForm {
    name: TextField,
    email: TextField,
    age: TextField,
    attending_with_guest: SelectField,
    guest_name: TextField,
    focus: usize,
    errors: Errors,
}

impl Default for EventRegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistrationForm {
    /// A blank form, guest selector on "No".
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: TextField::new(),
            email: TextField::new(),
            age: TextField::new(),
            attending_with_guest: SelectField::new(GUEST_OPTIONS),
            guest_name: TextField::new(),
            focus: 0,
            errors: Errors::new(),
        }
    }

    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<EventRegistrationForm>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new(vec![
                FieldRule::value("name", |s: &Self| s.name.value())
                    .required("Name is required"),
                FieldRule::value("email", |s: &Self| s.email.value())
                    .required("Email is required")
                    .email("Email is invalid"),
                FieldRule::value("age", |s: &Self| s.age.value())
                    .required("Age is required")
                    .positive_number("Age must be a number greater than 0"),
                FieldRule::value("guestName", |s: &Self| s.guest_name.value())
                    .visible_when(|s| s.attending_with_guest())
                    .required("Guest name is required"),
            ])
        })
    }

    /// Whether the guest section is visible.
    #[must_use]
    pub fn attending_with_guest(&self) -> bool {
        self.attending_with_guest.value() == "Yes"
    }

    /// Current validation errors.
    #[must_use]
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    fn visible_fields(&self) -> Vec<FieldId> {
        let mut fields = vec![
            FieldId::Name,
            FieldId::Email,
            FieldId::Age,
            FieldId::AttendingWithGuest,
        ];
        if self.attending_with_guest() {
            fields.push(FieldId::GuestName);
        }
        fields
    }

    fn focused_field(&self) -> FieldId {
        let fields = self.visible_fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    /// Route a key event. Tab moves focus, Enter submits, everything else
    /// edits the focused field.
    pub fn handle_key(&mut self, key: &KeyEvent) -> FormEffect {
        match key.code {
            KeyCode::Tab => {
                self.focus = cycle_focus(self.focus, self.visible_fields().len(), true);
                FormEffect::None
            }
            KeyCode::BackTab => {
                self.focus = cycle_focus(self.focus, self.visible_fields().len(), false);
                FormEffect::None
            }
            KeyCode::Enter => self.submit(),
            _ => {
                self.edit_focused(key);
                FormEffect::None
            }
        }
    }

    fn edit_focused(&mut self, key: &KeyEvent) {
        let field = self.focused_field();
        let changed = match field {
            FieldId::Name => self.name.handle_key(key),
            FieldId::Email => self.email.handle_key(key),
            FieldId::Age => self.age.handle_key(key),
            FieldId::AttendingWithGuest => {
                let changed = self.attending_with_guest.handle_key(key);
                if changed {
                    // The guest field may have just disappeared; keep the
                    // focus inside the visible range.
                    let len = self.visible_fields().len();
                    self.focus = self.focus.min(len - 1);
                }
                changed
            }
            FieldId::GuestName => self.guest_name.handle_key(key),
        };
        if changed {
            self.errors.clear(field.key());
        }
    }

    fn submit(&mut self) -> FormEffect {
        self.errors = Self::rules().evaluate(self);
        if self.errors.is_empty() {
            FormEffect::Submit(notification_body(&self.record()))
        } else {
            FormEffect::None
        }
    }

    /// Snapshot every field, hidden ones included.
    #[must_use]
    pub fn record(&self) -> EventRegistrationRecord {
        EventRegistrationRecord {
            name: self.name.value().to_string(),
            email: self.email.value().to_string(),
            age: self.age.value().to_string(),
            attending_with_guest: self.attending_with_guest.value().to_string(),
            guest_name: self.guest_name.value().to_string(),
        }
    }

    /// Draw the form starting at row `y`.
    pub fn draw(&self, surface: &mut Surface, y: u16) {
        let focused = self.focused_field();
        let mut row = y;
        for field in self.visible_fields() {
            let error = self.errors.get(field.key());
            let is_focused = field == focused;
            row = match field {
                FieldId::Name => {
                    draw_text_row(surface, row, "Name:", &self.name, is_focused, error)
                }
                FieldId::Email => {
                    draw_text_row(surface, row, "Email:", &self.email, is_focused, error)
                }
                FieldId::Age => draw_text_row(surface, row, "Age:", &self.age, is_focused, error),
                FieldId::AttendingWithGuest => draw_select_row(
                    surface,
                    row,
                    "Are you attending with a guest?",
                    &self.attending_with_guest,
                    is_focused,
                    error,
                ),
                FieldId::GuestName => draw_text_row(
                    surface,
                    row,
                    "Guest Name:",
                    &self.guest_name,
                    is_focused,
                    error,
                ),
            };
        }
    }

    #[cfg(test)]
    pub(crate) fn fill_valid(&mut self) {
        self.name.set_value("Ada Lovelace");
        self.email.set_value("ada@lovelace.org");
        self.age.set_value("36");
    }

    #[cfg(test)]
    pub(crate) fn set_guest(&mut self, attending: bool) {
        self.attending_with_guest
            .select(if attending { "Yes" } else { "No" });
    }
}
