#![forbid(unsafe_code)]

//! Survey form.
//!
//! Picking a topic reveals that topic's section and kicks off a background
//! fetch of additional questions. Every fetch carries a generation token;
//! a response is applied only while its token is still current, so a slow
//! response for an old topic can never overwrite the list for the new one.
//!
//! Fetched questions become ordered (prompt, answer) pairs appended to the
//! focus ring. Answers are optional and are submitted alongside the
//! record.

use std::sync::OnceLock;

use formdeck_runtime::{KeyCode, KeyEvent, RequestToken, Surface, TokenSource};
use formdeck_validate::{FieldRule, RuleSet, rules::Errors};
use tracing::{debug, warn};

use crate::fields::{SelectField, TextField};
use crate::forms::{FormEffect, cycle_focus, draw_select_row, draw_text_row};
use crate::questions::QuestionSourceError;
use crate::submit::{AnsweredQuestion, SurveyRecord, survey_notification_body};

const TOPIC_OPTIONS: &[&str] = &["", "Technology", "Health", "Education"];
const LANGUAGE_OPTIONS: &[&str] = &["", "JavaScript", "Python", "Java", "C#"];
const EXERCISE_OPTIONS: &[&str] = &["", "Daily", "Weekly", "Monthly", "Rarely"];
const DIET_OPTIONS: &[&str] = &["", "Vegetarian", "Vegan", "Non-Vegetarian"];
const QUALIFICATION_OPTIONS: &[&str] = &["", "High School", "Bachelor's", "Master's", "PhD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldId {
    FullName,
    Email,
    SurveyTopic,
    FavoriteProgrammingLanguage,
    YearsOfExperience,
    ExerciseFrequency,
    DietPreference,
    HighestQualification,
    FieldOfStudy,
    Feedback,
    Answer(usize),
}

impl FieldId {
    const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::SurveyTopic => "surveyTopic",
            Self::FavoriteProgrammingLanguage => "favoriteProgrammingLanguage",
            Self::YearsOfExperience => "yearsOfExperience",
            Self::ExerciseFrequency => "exerciseFrequency",
            Self::DietPreference => "dietPreference",
            Self::HighestQualification => "highestQualification",
            Self::FieldOfStudy => "fieldOfStudy",
            Self::Feedback => "feedback",
            // Answers are optional and never validated.
            Self::Answer(_) => "",
        }
    }
}

/// State of the survey form.
#[derive(Debug, Clone)]
pub struct SurveyForm {
    full_name: TextField,
    email: TextField,
    survey_topic: SelectField,
    favorite_programming_language: SelectField,
    years_of_experience: TextField,
    exercise_frequency: SelectField,
    diet_preference: SelectField,
    highest_qualification: SelectField,
    field_of_study: TextField,
    feedback: TextField,
    /// Fetched questions with their answers, in fetch order.
    answers: Vec<(String, TextField)>,
    tokens: TokenSource,
    current_token: RequestToken,
    focus: usize,
    errors: Errors,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyForm {
    /// A blank form, topic on the placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            full_name: TextField::new(),
            email: TextField::new(),
            survey_topic: SelectField::new(TOPIC_OPTIONS),
            favorite_programming_language: SelectField::new(LANGUAGE_OPTIONS),
            years_of_experience: TextField::new(),
            exercise_frequency: SelectField::new(EXERCISE_OPTIONS),
            diet_preference: SelectField::new(DIET_OPTIONS),
            highest_qualification: SelectField::new(QUALIFICATION_OPTIONS),
            field_of_study: TextField::new(),
            feedback: TextField::new(),
            answers: Vec::new(),
            tokens: TokenSource::new(),
            current_token: RequestToken::NONE,
            focus: 0,
            errors: Errors::new(),
        }
    }

    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<SurveyForm>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new(vec![
                FieldRule::value("fullName", |s: &Self| s.full_name.value())
                    .required("Full Name is required"),
                FieldRule::value("email", |s: &Self| s.email.value())
                    .required("Email is required")
                    .email("Email is invalid"),
                FieldRule::value("surveyTopic", |s: &Self| s.survey_topic.value())
                    .required("Survey Topic is required"),
                FieldRule::value("favoriteProgrammingLanguage", |s: &Self| {
                    s.favorite_programming_language.value()
                })
                .visible_when(|s| s.topic() == "Technology")
                .required("Favorite Programming Language is required"),
                FieldRule::value("yearsOfExperience", |s: &Self| {
                    s.years_of_experience.value()
                })
                .visible_when(|s| s.topic() == "Technology")
                .required("Years of Experience is required")
                .positive_number("Years of Experience must be a number greater than 0"),
                FieldRule::value("exerciseFrequency", |s: &Self| {
                    s.exercise_frequency.value()
                })
                .visible_when(|s| s.topic() == "Health")
                .required("Exercise Frequency is required"),
                FieldRule::value("dietPreference", |s: &Self| s.diet_preference.value())
                    .visible_when(|s| s.topic() == "Health")
                    .required("Diet Preference is required"),
                FieldRule::value("highestQualification", |s: &Self| {
                    s.highest_qualification.value()
                })
                .visible_when(|s| s.topic() == "Education")
                .required("Highest Qualification is required"),
                FieldRule::value("fieldOfStudy", |s: &Self| s.field_of_study.value())
                    .visible_when(|s| s.topic() == "Education")
                    .required("Field of Study is required"),
                FieldRule::value("feedback", |s: &Self| s.feedback.value()).min_chars(
                    50,
                    "Feedback is required and must be at least 50 characters",
                ),
            ])
        })
    }

    /// The selected topic, empty while on the placeholder.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        self.survey_topic.value()
    }

    /// Current validation errors.
    #[must_use]
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// The fetched question prompts, in order.
    #[must_use]
    pub fn question_prompts(&self) -> Vec<&str> {
        self.answers.iter().map(|(q, _)| q.as_str()).collect()
    }

    /// The generation the survey currently accepts responses for.
    #[must_use]
    pub fn current_token(&self) -> RequestToken {
        self.current_token
    }

    fn visible_fields(&self) -> Vec<FieldId> {
        let mut fields = vec![FieldId::FullName, FieldId::Email, FieldId::SurveyTopic];
        match self.topic() {
            "Technology" => fields.extend([
                FieldId::FavoriteProgrammingLanguage,
                FieldId::YearsOfExperience,
            ]),
            "Health" => fields.extend([FieldId::ExerciseFrequency, FieldId::DietPreference]),
            "Education" => fields.extend([FieldId::HighestQualification, FieldId::FieldOfStudy]),
            _ => {}
        }
        fields.push(FieldId::Feedback);
        fields.extend((0..self.answers.len()).map(FieldId::Answer));
        fields
    }

    fn focused_field(&self) -> FieldId {
        let fields = self.visible_fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    /// Route a key event. Tab moves focus, Enter submits, everything else
    /// edits the focused field. A topic change produces a fetch effect.
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
            _ => self.edit_focused(key),
        }
    }

    fn edit_focused(&mut self, key: &KeyEvent) -> FormEffect {
        let field = self.focused_field();
        let mut effect = FormEffect::None;
        let changed = match field {
            FieldId::FullName => self.full_name.handle_key(key),
            FieldId::Email => self.email.handle_key(key),
            FieldId::SurveyTopic => {
                let changed = self.survey_topic.handle_key(key);
                if changed {
                    effect = self.topic_changed();
                }
                changed
            }
            FieldId::FavoriteProgrammingLanguage => {
                self.favorite_programming_language.handle_key(key)
            }
            FieldId::YearsOfExperience => self.years_of_experience.handle_key(key),
            FieldId::ExerciseFrequency => self.exercise_frequency.handle_key(key),
            FieldId::DietPreference => self.diet_preference.handle_key(key),
            FieldId::HighestQualification => self.highest_qualification.handle_key(key),
            FieldId::FieldOfStudy => self.field_of_study.handle_key(key),
            FieldId::Feedback => self.feedback.handle_key(key),
            FieldId::Answer(idx) => match self.answers.get_mut(idx) {
                Some((_, answer)) => answer.handle_key(key),
                None => false,
            },
        };
        if changed && !field.key().is_empty() {
            self.errors.clear(field.key());
        }
        effect
    }

    /// Invalidate in-flight responses and start a fetch for the new topic.
    /// Clearing the topic just drops the question list.
    fn topic_changed(&mut self) -> FormEffect {
        self.answers.clear();
        self.focus = self.focus.min(self.visible_fields().len() - 1);
        let topic = self.topic();
        if topic.is_empty() {
            self.current_token = RequestToken::NONE;
            return FormEffect::None;
        }
        self.current_token = self.tokens.issue();
        debug!(topic, token = self.current_token.value(), "fetching questions");
        FormEffect::FetchQuestions {
            topic,
            token: self.current_token,
        }
    }

    /// Apply a fetch result. Responses stamped with a superseded token are
    /// ignored; failures leave the list empty.
    pub fn apply_questions(
        &mut self,
        token: RequestToken,
        result: Result<Vec<String>, QuestionSourceError>,
    ) {
        if token != self.current_token {
            debug!(
                stale = token.value(),
                current = self.current_token.value(),
                "dropping stale question response"
            );
            return;
        }
        match result {
            Ok(questions) => {
                self.answers = questions
                    .into_iter()
                    .map(|q| (q, TextField::new()))
                    .collect();
            }
            Err(err) => {
                warn!(topic = self.topic(), "question fetch failed: {err}");
                self.answers.clear();
            }
        }
        self.focus = self.focus.min(self.visible_fields().len() - 1);
    }

    fn submit(&mut self) -> FormEffect {
        self.errors = Self::rules().evaluate(self);
        if self.errors.is_empty() {
            FormEffect::Submit(survey_notification_body(
                &self.record(),
                &self.answered_questions(),
            ))
        } else {
            FormEffect::None
        }
    }

    /// Snapshot every field, hidden ones included.
    #[must_use]
    pub fn record(&self) -> SurveyRecord {
        SurveyRecord {
            full_name: self.full_name.value().to_string(),
            email: self.email.value().to_string(),
            survey_topic: self.survey_topic.value().to_string(),
            favorite_programming_language: self.favorite_programming_language.value().to_string(),
            years_of_experience: self.years_of_experience.value().to_string(),
            exercise_frequency: self.exercise_frequency.value().to_string(),
            diet_preference: self.diet_preference.value().to_string(),
            highest_qualification: self.highest_qualification.value().to_string(),
            field_of_study: self.field_of_study.value().to_string(),
            feedback: self.feedback.value().to_string(),
        }
    }

    /// The fetched questions paired with whatever was answered.
    #[must_use]
    pub fn answered_questions(&self) -> Vec<AnsweredQuestion> {
        self.answers
            .iter()
            .map(|(question, answer)| AnsweredQuestion {
                question: question.clone(),
                answer: answer.value().to_string(),
            })
            .collect()
    }

    /// Draw the form starting at row `y`.
    pub fn draw(&self, surface: &mut Surface, y: u16) {
        let focused = self.focused_field();
        let mut row = y;
        for field in self.visible_fields() {
            let is_focused = field == focused;
            let error = self.errors.get(field.key());
            row = match field {
                FieldId::FullName => {
                    draw_text_row(surface, row, "Full Name:", &self.full_name, is_focused, error)
                }
                FieldId::Email => {
                    draw_text_row(surface, row, "Email:", &self.email, is_focused, error)
                }
                FieldId::SurveyTopic => draw_select_row(
                    surface,
                    row,
                    "Survey Topic:",
                    &self.survey_topic,
                    is_focused,
                    error,
                ),
                FieldId::FavoriteProgrammingLanguage => draw_select_row(
                    surface,
                    row,
                    "Favorite Language:",
                    &self.favorite_programming_language,
                    is_focused,
                    error,
                ),
                FieldId::YearsOfExperience => draw_text_row(
                    surface,
                    row,
                    "Years of Experience:",
                    &self.years_of_experience,
                    is_focused,
                    error,
                ),
                FieldId::ExerciseFrequency => draw_select_row(
                    surface,
                    row,
                    "Exercise Frequency:",
                    &self.exercise_frequency,
                    is_focused,
                    error,
                ),
                FieldId::DietPreference => draw_select_row(
                    surface,
                    row,
                    "Diet Preference:",
                    &self.diet_preference,
                    is_focused,
                    error,
                ),
                FieldId::HighestQualification => draw_select_row(
                    surface,
                    row,
                    "Highest Qualification:",
                    &self.highest_qualification,
                    is_focused,
                    error,
                ),
                FieldId::FieldOfStudy => draw_text_row(
                    surface,
                    row,
                    "Field of Study:",
                    &self.field_of_study,
                    is_focused,
                    error,
                ),
                FieldId::Feedback => {
                    draw_text_row(surface, row, "Feedback:", &self.feedback, is_focused, error)
                }
                FieldId::Answer(idx) => {
                    let (question, answer) = &self.answers[idx];
                    draw_text_row(surface, row, question, answer, is_focused, None)
                }
            };
        }
    }

    #[cfg(test)]
    pub(crate) fn fill_valid(&mut self) {
        self.full_name.set_value("Ada Lovelace");
        self.email.set_value("ada@lovelace.org");
        self.survey_topic.select("Health");
        self.exercise_frequency.select("Daily");
        self.diet_preference.select("Vegan");
        self.feedback.set_value("x".repeat(50));
    }

    #[cfg(test)]
    pub(crate) fn select_topic(&mut self, topic: &str) -> FormEffect {
        if self.survey_topic.select(topic) {
            self.topic_changed()
        } else {
            FormEffect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    #[test]
    fn empty_submit_reports_base_fields() {
        let mut form = SurveyForm::new();
        form.handle_key(&press(KeyCode::Enter));
        let errors = form.errors();
        assert_eq!(errors.get("fullName"), Some("Full Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("surveyTopic"), Some("Survey Topic is required"));
        assert_eq!(
            errors.get("feedback"),
            Some("Feedback is required and must be at least 50 characters")
        );
        assert!(errors.get("favoriteProgrammingLanguage").is_none());
        assert!(errors.get("exerciseFrequency").is_none());
        assert!(errors.get("highestQualification").is_none());
    }

    #[test]
    fn technology_section_validates_language_and_years() {
        let mut form = SurveyForm::new();
        form.select_topic("Technology");
        form.years_of_experience.set_value("zero");
        form.handle_key(&press(KeyCode::Enter));
        assert_eq!(
            form.errors().get("favoriteProgrammingLanguage"),
            Some("Favorite Programming Language is required")
        );
        assert_eq!(
            form.errors().get("yearsOfExperience"),
            Some("Years of Experience must be a number greater than 0")
        );
    }

    #[test]
    fn education_section_validates_its_fields() {
        let mut form = SurveyForm::new();
        form.select_topic("Education");
        form.handle_key(&press(KeyCode::Enter));
        assert_eq!(
            form.errors().get("highestQualification"),
            Some("Highest Qualification is required")
        );
        assert_eq!(
            form.errors().get("fieldOfStudy"),
            Some("Field of Study is required")
        );
    }

    #[test]
    fn short_feedback_is_rejected() {
        let mut form = SurveyForm::new();
        form.fill_valid();
        form.feedback.set_value("too short");
        form.handle_key(&press(KeyCode::Enter));
        assert!(form.errors().contains("feedback"));
    }

    #[test]
    fn topic_change_issues_fetch_with_fresh_token() {
        let mut form = SurveyForm::new();
        let effect = form.select_topic("Technology");
        let FormEffect::FetchQuestions { topic, token } = effect else {
            panic!("expected fetch effect");
        };
        assert_eq!(topic, "Technology");
        assert_ne!(token, RequestToken::NONE);
        assert_eq!(token, form.current_token());

        let effect = form.select_topic("Health");
        let FormEffect::FetchQuestions { token: second, .. } = effect else {
            panic!("expected fetch effect");
        };
        assert!(second > token);
    }

    #[test]
    fn clearing_the_topic_drops_questions_without_fetching() {
        let mut form = SurveyForm::new();
        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Health") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Ok(vec!["How do you unwind?".into()]));
        assert_eq!(form.question_prompts(), vec!["How do you unwind?"]);

        let effect = form.select_topic("");
        assert_eq!(effect, FormEffect::None);
        assert!(form.question_prompts().is_empty());
        assert_eq!(form.current_token(), RequestToken::NONE);
    }

    #[test]
    fn matching_response_installs_questions() {
        let mut form = SurveyForm::new();
        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Technology") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Ok(vec!["Q1".into(), "Q2".into()]));
        assert_eq!(form.question_prompts(), vec!["Q1", "Q2"]);
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut form = SurveyForm::new();
        let FormEffect::FetchQuestions { token: stale, .. } = form.select_topic("Technology")
        else {
            panic!("expected fetch effect");
        };
        let FormEffect::FetchQuestions { token: current, .. } = form.select_topic("Health")
        else {
            panic!("expected fetch effect");
        };

        // The older response arrives after the newer request was issued.
        form.apply_questions(stale, Ok(vec!["tech question".into()]));
        assert!(form.question_prompts().is_empty());

        form.apply_questions(current, Ok(vec!["health question".into()]));
        assert_eq!(form.question_prompts(), vec!["health question"]);
    }

    #[test]
    fn fetch_failure_leaves_the_list_empty() {
        let mut form = SurveyForm::new();
        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Technology") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Ok(vec!["Q1".into()]));

        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Health") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Err(QuestionSourceError::new("timeout")));
        assert!(form.question_prompts().is_empty());
    }

    #[test]
    fn new_question_list_resets_answers() {
        let mut form = SurveyForm::new();
        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Technology") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Ok(vec!["Q1".into()]));

        // Tab to the answer row and type something.
        while form.focused_field() != FieldId::Answer(0) {
            form.handle_key(&press(KeyCode::Tab));
        }
        form.handle_key(&press(KeyCode::Char('y')));
        assert_eq!(form.answered_questions()[0].answer, "y");

        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Health") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Ok(vec!["Q1".into()]));
        assert_eq!(form.answered_questions()[0].answer, "");
    }

    #[test]
    fn valid_submit_includes_answers() {
        let mut form = SurveyForm::new();
        let FormEffect::FetchQuestions { token, .. } = form.select_topic("Health") else {
            panic!("expected fetch effect");
        };
        form.apply_questions(token, Ok(vec!["How do you unwind?".into()]));
        form.fill_valid();

        while form.focused_field() != FieldId::Answer(0) {
            form.handle_key(&press(KeyCode::Tab));
        }
        for c in "walks".chars() {
            form.handle_key(&press(KeyCode::Char(c)));
        }

        let FormEffect::Submit(body) = form.handle_key(&press(KeyCode::Enter)) else {
            panic!("expected submit effect");
        };
        assert!(body.contains("\"surveyTopic\": \"Health\""));
        assert!(body.contains("Additional Questions:"));
        assert!(body.contains("\"answer\": \"walks\""));
    }

    #[test]
    fn hidden_section_values_still_serialize() {
        let mut form = SurveyForm::new();
        form.fill_valid();
        form.highest_qualification.select("PhD");
        let FormEffect::Submit(body) = form.handle_key(&press(KeyCode::Enter)) else {
            panic!("expected submit effect");
        };
        assert!(body.contains("\"highestQualification\": \"PhD\""));
    }

    #[test]
    fn focus_clamps_when_topic_section_shrinks() {
        let mut form = SurveyForm::new();
        form.select_topic("Technology");
        // Focus the last visible field.
        let last = form.visible_fields().len() - 1;
        for _ in 0..last {
            form.handle_key(&press(KeyCode::Tab));
        }
        assert_eq!(form.focused_field(), FieldId::Feedback);
        form.select_topic("");
        let fields = form.visible_fields();
        assert!(fields.contains(&form.focused_field()));
    }
}
