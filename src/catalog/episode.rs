use serde::Deserialize;
use url::Url;

use crate::{
    quiz::{definition::string_or_number, Question, QuizDefinition, QuizOption},
    theme::Accent,
};

pub const DEFAULT_INSTRUCTIONS: [&str; 5] = [
    "Read each question carefully",
    "Select the answer you think is correct",
    "Click 'Submit Answer' to check your response",
    "Review the explanation to learn more",
    "Click 'Next Question' to continue",
];

const DEFAULT_DILEMMA_ABOUT: &str = "Test your ethical decision-making with real-world scenarios";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    id: u32,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    guest: Option<String>,
    #[serde(default)]
    credits: Option<String>,
    #[serde(default)]
    color_theme: Option<String>,
    #[serde(default)]
    references: Vec<String>,
    #[serde(default)]
    game_content: Option<GameContent>,
}

/// Game attached to an episode, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameContent {
    EthicalDilemmas(DilemmaSet),
    /// Stem of a file in `quizzes/`.
    Quiz { file: String },
    Embed {
        url: Url,
        #[serde(default)]
        title: Option<String>,
    },
    Custom { content: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilemmaSet {
    #[serde(default)]
    about: Option<String>,
    #[serde(default)]
    how_to_play: Option<HowToPlay>,
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HowToPlay {
    #[serde(default)]
    steps: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    options: Vec<ScenarioOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioOption {
    text: String,
    #[serde(default)]
    correct: Option<bool>,
    #[serde(default)]
    feedback: Option<String>,
}

impl Episode {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn guest(&self) -> Option<&str> {
        self.guest.as_deref()
    }

    pub fn credits(&self) -> Option<&str> {
        self.credits.as_deref()
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn accent(&self) -> Accent {
        self.color_theme
            .as_deref()
            .map(Accent::from_name)
            .unwrap_or_default()
    }

    pub fn game_content(&self) -> Option<&GameContent> {
        self.game_content.as_ref()
    }
}

impl DilemmaSet {
    pub fn about(&self) -> &str {
        self.about.as_deref().unwrap_or(DEFAULT_DILEMMA_ABOUT)
    }

    /// Custom steps, or the default ones when the set has none.
    pub fn instructions(&self) -> Vec<String> {
        match &self.how_to_play {
            Some(how) if !how.steps.is_empty() => how.steps.clone(),
            _ => default_instructions(),
        }
    }

    /// Reshapes the scenarios into an ordinary quiz.
    pub fn to_quiz(&self, title: &str) -> QuizDefinition {
        let questions = self
            .scenarios
            .iter()
            .map(|scenario| {
                let options = scenario
                    .options
                    .iter()
                    .map(|option| {
                        let quiz_option =
                            QuizOption::new(option.text.clone(), option.correct == Some(true));
                        match &option.feedback {
                            Some(feedback) => quiz_option.with_feedback(feedback.clone()),
                            None => quiz_option,
                        }
                    })
                    .collect();
                Question::new(
                    scenario.id.clone(),
                    format!("{}\n\n{}", scenario.title, scenario.description),
                    options,
                    None,
                )
            })
            .collect();

        QuizDefinition::new(title, self.about(), questions)
    }
}

pub fn default_instructions() -> Vec<String> {
    DEFAULT_INSTRUCTIONS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPISODE: &str = r#"{
        "id": 2,
        "title": "Code & Conscience",
        "description": "Ethics in software.",
        "host": "Sam",
        "colorTheme": "pink",
        "references": ["ACM Code of Ethics"],
        "gameContent": {
            "type": "ethical-dilemmas",
            "scenarios": [{
                "id": 1,
                "title": "The Deadline",
                "description": "Your manager asks you to skip tests.",
                "options": [
                    { "text": "Skip them", "feedback": "Bugs ship." },
                    { "text": "Push back", "correct": true, "feedback": "Quality matters." }
                ]
            }]
        }
    }"#;

    #[test]
    fn test_dilemmas_become_quiz_questions() {
        let episode: Episode = serde_json::from_str(EPISODE).unwrap();
        let Some(GameContent::EthicalDilemmas(set)) = episode.game_content() else {
            panic!("expected ethical dilemmas");
        };

        let quiz = set.to_quiz(episode.title());

        assert_eq!(quiz.title(), "Code & Conscience");
        assert_eq!(quiz.description(), DEFAULT_DILEMMA_ABOUT);
        let question = &quiz.questions()[0];
        assert_eq!(question.id(), "1");
        assert_eq!(
            question.prompt(),
            "The Deadline\n\nYour manager asks you to skip tests."
        );
        assert!(!question.options()[0].is_correct());
        assert!(question.options()[1].is_correct());
        assert_eq!(question.options()[1].feedback(), Some("Quality matters."));
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_missing_steps_use_default_instructions() {
        let episode: Episode = serde_json::from_str(EPISODE).unwrap();
        let Some(GameContent::EthicalDilemmas(set)) = episode.game_content() else {
            panic!("expected ethical dilemmas");
        };

        assert_eq!(set.instructions().len(), DEFAULT_INSTRUCTIONS.len());
        assert_eq!(episode.accent(), Accent::Pink);
    }

    #[test]
    fn test_parses_embed_content() {
        let json = r#"{
            "id": 3,
            "title": "Crossword",
            "gameContent": { "type": "embed", "url": "https://crosswordlabs.com/embed/ise-222" }
        }"#;

        let episode: Episode = serde_json::from_str(json).unwrap();

        assert!(matches!(
            episode.game_content(),
            Some(GameContent::Embed { url, title: None }) if url.host_str() == Some("crosswordlabs.com")
        ));
        assert_eq!(episode.accent(), Accent::Yellow);
    }
}
