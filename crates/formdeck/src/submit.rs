#![forbid(unsafe_code)]

//! Submission records and notification bodies.
//!
//! Each form serializes everything it holds, hidden fields included, into
//! a camelCase JSON object. The notification body is the pretty-printed
//! record under a `Form Submitted:` heading; the survey appends its
//! additional questions as a second JSON document.

use serde::Serialize;

/// Event registration submission.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationRecord {
    pub name: String,
    pub email: String,
    pub age: String,
    pub attending_with_guest: String,
    pub guest_name: String,
}

/// Skill checkboxes, keyed the way the skills are labelled.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SkillsRecord {
    #[serde(rename = "JavaScript")]
    pub javascript: bool,
    #[serde(rename = "CSS")]
    pub css: bool,
    #[serde(rename = "Python")]
    pub python: bool,
}

/// Job application submission.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRecord {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub position: String,
    pub experience: String,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: String,
    pub management_experience: String,
    pub skills: SkillsRecord,
    pub interview_time: String,
}

/// Survey submission.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    pub full_name: String,
    pub email: String,
    pub survey_topic: String,
    pub favorite_programming_language: String,
    pub years_of_experience: String,
    pub exercise_frequency: String,
    pub diet_preference: String,
    pub highest_qualification: String,
    pub field_of_study: String,
    pub feedback: String,
}

/// One fetched question with whatever the user answered.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: String,
}

fn pretty<T: Serialize>(value: &T) -> String {
    // These records contain only strings and bools; serialization cannot
    // fail on them.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// The notification body for the event and job forms.
pub fn notification_body<T: Serialize>(record: &T) -> String {
    format!("Form Submitted:\n{}", pretty(record))
}

/// The survey notification body, questions appended.
pub fn survey_notification_body(record: &SurveyRecord, questions: &[AnsweredQuestion]) -> String {
    format!(
        "Form Submitted:\n{}\nAdditional Questions:\n{}",
        pretty(record),
        pretty(&questions)
    )
}
