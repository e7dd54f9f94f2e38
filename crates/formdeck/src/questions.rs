#![forbid(unsafe_code)]

//! Additional-question sources for the survey.
//!
//! The survey asks a topic-specific follow-up list once a topic is picked.
//! Where the questions come from is a collaborator concern behind
//! [`QuestionSource`]; the binary wires in [`CannedQuestionSource`], tests
//! wire in scripted implementations.

/// A question lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSourceError {
    message: String,
}

impl QuestionSourceError {
    /// An error with a human-readable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for QuestionSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "question fetch failed: {}", self.message)
    }
}

impl std::error::Error for QuestionSourceError {}

/// Supplies the additional questions for a survey topic.
///
/// Implementations may block; the runtime calls this from a background
/// task thread, never from `update`.
pub trait QuestionSource: Send + Sync {
    /// Fetch the question prompts for a topic, in display order.
    fn fetch(&self, topic: &str) -> Result<Vec<String>, QuestionSourceError>;
}

/// A fixed in-process question list per topic. Unknown topics get an
/// empty list rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedQuestionSource;

impl CannedQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl QuestionSource for CannedQuestionSource {
    fn fetch(&self, topic: &str) -> Result<Vec<String>, QuestionSourceError> {
        let questions: &[&str] = match topic {
            "Technology" => &[
                "Which development tools do you use most?",
                "How do you keep up with new technology?",
            ],
            "Health" => &[
                "How many hours do you sleep on average?",
                "Do you track any health metrics?",
            ],
            "Education" => &[
                "What was the most valuable course you took?",
                "Do you prefer self-study or classroom learning?",
            ],
            _ => &[],
        };
        Ok(questions.iter().map(|q| (*q).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_source_covers_every_topic() {
        let source = CannedQuestionSource::new();
        for topic in ["Technology", "Health", "Education"] {
            let questions = source.fetch(topic).unwrap();
            assert!(!questions.is_empty(), "no questions for {topic}");
        }
    }

    #[test]
    fn unknown_topic_yields_empty_list() {
        let source = CannedQuestionSource::new();
        assert_eq!(source.fetch("Gardening").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn error_display_names_the_cause() {
        let err = QuestionSourceError::new("connection refused");
        assert_eq!(
            err.to_string(),
            "question fetch failed: connection refused"
        );
    }
}
