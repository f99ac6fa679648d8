use std::{collections::HashSet, fmt};

use serde::{Deserialize, Deserializer};

use crate::error::ContentError;

#[derive(Debug, Clone, Deserialize)]
pub struct QuizDefinition {
    title: String,
    #[serde(default)]
    description: String,
    questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(alias = "question")]
    prompt: String,
    options: Vec<QuizOption>,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizOption {
    text: String,
    #[serde(alias = "correct", default)]
    is_correct: bool,
    #[serde(default)]
    feedback: Option<String>,
}

/// Content files write ids either as `"q1"` or as `1`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

impl fmt::Display for QuizDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} questions)",
            self.title,
            self.questions.len()
        )
    }
}

impl QuizDefinition {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            questions,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Checks the authoring rules the engine itself does not enforce.
    ///
    /// Content is validated once when it is loaded, so a malformed file is
    /// reported at startup instead of surfacing halfway through a session.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.questions.is_empty() {
            return Err(ContentError::NoQuestions {
                quiz: self.title.clone(),
            });
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(ContentError::DuplicateQuestionId {
                    quiz: self.title.clone(),
                    question: question.id.clone(),
                });
            }
            if question.options.len() < 2 {
                return Err(ContentError::TooFewOptions {
                    quiz: self.title.clone(),
                    question: question.id.clone(),
                    found: question.options.len(),
                });
            }
            if question.correct_index().is_none() {
                return Err(ContentError::NoCorrectOption {
                    quiz: self.title.clone(),
                    question: question.id.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<QuizOption>,
        explanation: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
            explanation,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Index of the first option marked correct.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(QuizOption::is_correct)
    }
}

impl QuizOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_options() -> Vec<QuizOption> {
        vec![QuizOption::new("A", false), QuizOption::new("B", true)]
    }

    #[test]
    fn test_parses_site_quiz_field_names() {
        let json = r#"{
            "title": "Variables",
            "description": "Episode 1",
            "difficulty": "Beginner",
            "questions": [{
                "id": "q1",
                "question": "What is a variable?\nPick one.",
                "options": [
                    { "text": "A box", "correct": true },
                    { "text": "A loop", "correct": false }
                ],
                "explanation": "Variables hold values."
            }]
        }"#;

        let quiz: QuizDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(quiz.title(), "Variables");
        let question = &quiz.questions()[0];
        assert_eq!(question.prompt(), "What is a variable?\nPick one.");
        assert_eq!(question.correct_index(), Some(0));
        assert_eq!(question.explanation(), Some("Variables hold values."));
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_correct_index_is_first_correct_option() {
        let question = Question::new(
            "q1",
            "Pick",
            vec![
                QuizOption::new("A", false),
                QuizOption::new("B", true),
                QuizOption::new("C", true),
            ],
            None,
        );

        assert_eq!(question.correct_index(), Some(1));
    }

    #[test]
    fn test_validate_rejects_empty_quiz() {
        let quiz = QuizDefinition::new("Empty", "", vec![]);

        assert!(matches!(
            quiz.validate(),
            Err(ContentError::NoQuestions { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let quiz = QuizDefinition::new(
            "Dupes",
            "",
            vec![
                Question::new("q1", "One", two_options(), None),
                Question::new("q1", "Two", two_options(), None),
            ],
        );

        assert!(matches!(
            quiz.validate(),
            Err(ContentError::DuplicateQuestionId { question, .. }) if question == "q1"
        ));
    }

    #[test]
    fn test_validate_rejects_question_without_correct_option() {
        let quiz = QuizDefinition::new(
            "Nothing right",
            "",
            vec![Question::new(
                "q1",
                "One",
                vec![QuizOption::new("A", false), QuizOption::new("B", false)],
                None,
            )],
        );

        assert!(matches!(
            quiz.validate(),
            Err(ContentError::NoCorrectOption { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_single_option() {
        let quiz = QuizDefinition::new(
            "Lonely",
            "",
            vec![Question::new("q1", "One", vec![QuizOption::new("A", true)], None)],
        );

        assert!(matches!(
            quiz.validate(),
            Err(ContentError::TooFewOptions { found: 1, .. })
        ));
    }
}
