#![forbid(unsafe_code)]

//! Job application form.
//!
//! The position selector drives three conditional fields: relevant
//! experience for developers and designers, portfolio URL for designers,
//! management experience for managers. The skills checkboxes validate as
//! a group: at least one must be ticked.

use std::sync::OnceLock;

use formdeck_runtime::{KeyCode, KeyEvent, Surface};
use formdeck_validate::validators::{ERROR_CODE_CUSTOM, ValidationError};
use formdeck_validate::{FieldRule, RuleSet, rules::Errors};

use crate::fields::{CheckboxField, SelectField, TextField};
use crate::forms::{FormEffect, cycle_focus, draw_checkbox_row, draw_select_row, draw_text_row};
use crate::submit::{JobApplicationRecord, SkillsRecord, notification_body};

const POSITION_OPTIONS: &[&str] = &["", "Developer", "Designer", "Manager"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldId {
    FullName,
    Email,
    PhoneNumber,
    Position,
    Experience,
    PortfolioUrl,
    ManagementExperience,
    SkillJavaScript,
    SkillCss,
    SkillPython,
    InterviewTime,
}

impl FieldId {
    /// The error-record key. The three skill checkboxes share one.
    const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::Position => "position",
            Self::Experience => "experience",
            Self::PortfolioUrl => "portfolioURL",
            Self::ManagementExperience => "managementExperience",
            Self::SkillJavaScript | Self::SkillCss | Self::SkillPython => "skills",
            Self::InterviewTime => "interviewTime",
        }
    }
}

/// State of the job application form.
#[derive(Debug, Clone)]
pub struct JobApplicationForm {
    full_name: TextField,
    email: TextField,
    phone_number: TextField,
    position: SelectField,
    experience: TextField,
    portfolio_url: TextField,
    management_experience: TextField,
    skill_javascript: CheckboxField,
    skill_css: CheckboxField,
    skill_python: CheckboxField,
    interview_time: TextField,
    focus: usize,
    errors: Errors,
}

impl Default for JobApplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl JobApplicationForm {
    /// A blank form, position on the placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            full_name: TextField::new(),
            email: TextField::new(),
            phone_number: TextField::new(),
            position: SelectField::new(POSITION_OPTIONS),
            experience: TextField::new(),
            portfolio_url: TextField::new(),
            management_experience: TextField::new(),
            skill_javascript: CheckboxField::new(),
            skill_css: CheckboxField::new(),
            skill_python: CheckboxField::new(),
            interview_time: TextField::new(),
            focus: 0,
            errors: Errors::new(),
        }
    }

    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<JobApplicationForm>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new(vec![
                FieldRule::value("fullName", |s: &Self| s.full_name.value())
                    .required("Full Name is required"),
                FieldRule::value("email", |s: &Self| s.email.value())
                    .required("Email is required")
                    .email("Email is invalid"),
                FieldRule::value("phoneNumber", |s: &Self| s.phone_number.value())
                    .required("Phone Number is required")
                    .numeric("Phone Number must be a valid number"),
                FieldRule::value("experience", |s: &Self| s.experience.value())
                    .visible_when(|s| s.shows_experience())
                    .required("Relevant Experience must be greater than 0")
                    .positive_number("Relevant Experience must be greater than 0"),
                FieldRule::value("portfolioURL", |s: &Self| s.portfolio_url.value())
                    .visible_when(|s| s.shows_portfolio())
                    .required("Portfolio URL is required")
                    .url("Portfolio URL is invalid"),
                FieldRule::value("managementExperience", |s: &Self| {
                    s.management_experience.value()
                })
                .visible_when(|s| s.shows_management())
                .required("Management Experience is required"),
                FieldRule::custom("skills", |s: &Self| {
                    if s.any_skill_selected() {
                        None
                    } else {
                        Some(ValidationError::new(
                            ERROR_CODE_CUSTOM,
                            "At least one skill must be selected",
                        ))
                    }
                }),
                FieldRule::value("interviewTime", |s: &Self| s.interview_time.value())
                    .required("Preferred Interview Time is required"),
            ])
        })
    }

    /// Experience is asked of developers and designers.
    #[must_use]
    pub fn shows_experience(&self) -> bool {
        matches!(self.position.value(), "Developer" | "Designer")
    }

    /// Portfolio is asked of designers.
    #[must_use]
    pub fn shows_portfolio(&self) -> bool {
        self.position.value() == "Designer"
    }

    /// Management experience is asked of managers.
    #[must_use]
    pub fn shows_management(&self) -> bool {
        self.position.value() == "Manager"
    }

    fn any_skill_selected(&self) -> bool {
        self.skill_javascript.checked() || self.skill_css.checked() || self.skill_python.checked()
    }

    /// Current validation errors.
    #[must_use]
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    fn visible_fields(&self) -> Vec<FieldId> {
        let mut fields = vec![
            FieldId::FullName,
            FieldId::Email,
            FieldId::PhoneNumber,
            FieldId::Position,
        ];
        if self.shows_experience() {
            fields.push(FieldId::Experience);
        }
        if self.shows_portfolio() {
            fields.push(FieldId::PortfolioUrl);
        }
        if self.shows_management() {
            fields.push(FieldId::ManagementExperience);
        }
        fields.extend([
            FieldId::SkillJavaScript,
            FieldId::SkillCss,
            FieldId::SkillPython,
            FieldId::InterviewTime,
        ]);
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
            FieldId::FullName => self.full_name.handle_key(key),
            FieldId::Email => self.email.handle_key(key),
            FieldId::PhoneNumber => self.phone_number.handle_key(key),
            FieldId::Position => {
                let changed = self.position.handle_key(key);
                if changed {
                    let len = self.visible_fields().len();
                    self.focus = self.focus.min(len - 1);
                }
                changed
            }
            FieldId::Experience => self.experience.handle_key(key),
            FieldId::PortfolioUrl => self.portfolio_url.handle_key(key),
            FieldId::ManagementExperience => self.management_experience.handle_key(key),
            FieldId::SkillJavaScript => self.skill_javascript.handle_key(key),
            FieldId::SkillCss => self.skill_css.handle_key(key),
            FieldId::SkillPython => self.skill_python.handle_key(key),
            FieldId::InterviewTime => self.interview_time.handle_key(key),
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
    pub fn record(&self) -> JobApplicationRecord {
        JobApplicationRecord {
            full_name: self.full_name.value().to_string(),
            email: self.email.value().to_string(),
            phone_number: self.phone_number.value().to_string(),
            position: self.position.value().to_string(),
            experience: self.experience.value().to_string(),
            portfolio_url: self.portfolio_url.value().to_string(),
            management_experience: self.management_experience.value().to_string(),
            skills: SkillsRecord {
                javascript: self.skill_javascript.checked(),
                css: self.skill_css.checked(),
                python: self.skill_python.checked(),
            },
            interview_time: self.interview_time.value().to_string(),
        }
    }

    /// Draw the form starting at row `y`.
    pub fn draw(&self, surface: &mut Surface, y: u16) {
        let focused = self.focused_field();
        let mut row = y;
        for field in self.visible_fields() {
            let is_focused = field == focused;
            // The group error renders once, under the last checkbox.
            let error = if field == FieldId::SkillPython
                || !matches!(
                    field,
                    FieldId::SkillJavaScript | FieldId::SkillCss | FieldId::SkillPython
                ) {
                self.errors.get(field.key())
            } else {
                None
            };
            row = match field {
                FieldId::FullName => {
                    draw_text_row(surface, row, "Full Name:", &self.full_name, is_focused, error)
                }
                FieldId::Email => {
                    draw_text_row(surface, row, "Email:", &self.email, is_focused, error)
                }
                FieldId::PhoneNumber => draw_text_row(
                    surface,
                    row,
                    "Phone Number:",
                    &self.phone_number,
                    is_focused,
                    error,
                ),
                FieldId::Position => draw_select_row(
                    surface,
                    row,
                    "Applying for Position:",
                    &self.position,
                    is_focused,
                    error,
                ),
                FieldId::Experience => draw_text_row(
                    surface,
                    row,
                    "Relevant Experience (years):",
                    &self.experience,
                    is_focused,
                    error,
                ),
                FieldId::PortfolioUrl => draw_text_row(
                    surface,
                    row,
                    "Portfolio URL:",
                    &self.portfolio_url,
                    is_focused,
                    error,
                ),
                FieldId::ManagementExperience => draw_text_row(
                    surface,
                    row,
                    "Management Experience:",
                    &self.management_experience,
                    is_focused,
                    error,
                ),
                FieldId::SkillJavaScript => draw_checkbox_row(
                    surface,
                    row,
                    "Skills: JavaScript",
                    &self.skill_javascript,
                    is_focused,
                    error,
                ),
                FieldId::SkillCss => draw_checkbox_row(
                    surface,
                    row,
                    "Skills: CSS",
                    &self.skill_css,
                    is_focused,
                    error,
                ),
                FieldId::SkillPython => draw_checkbox_row(
                    surface,
                    row,
                    "Skills: Python",
                    &self.skill_python,
                    is_focused,
                    error,
                ),
                FieldId::InterviewTime => draw_text_row(
                    surface,
                    row,
                    "Preferred Interview Time:",
                    &self.interview_time,
                    is_focused,
                    error,
                ),
            };
        }
    }

    #[cfg(test)]
    pub(crate) fn fill_valid(&mut self) {
        self.full_name.set_value("Grace Hopper");
        self.email.set_value("grace@navy.mil");
        self.phone_number.set_value("5551234");
        self.skill_javascript.set_checked(true);
        self.interview_time.set_value("Tuesday 10:00");
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, position: &str) {
        self.position.select(position);
    }
}
