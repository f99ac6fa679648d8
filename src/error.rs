use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),

    #[error("{name} can't be parsed: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("quiz '{quiz}' has no questions")]
    NoQuestions { quiz: String },

    #[error("quiz '{quiz}' repeats question id '{question}'")]
    DuplicateQuestionId { quiz: String, question: String },

    #[error("question '{question}' of quiz '{quiz}' needs at least two options, found {found}")]
    TooFewOptions {
        quiz: String,
        question: String,
        found: usize,
    },

    #[error("question '{question}' of quiz '{quiz}' has no correct option")]
    NoCorrectOption { quiz: String, question: String },

    #[error("two games are named '{name}'")]
    DuplicateEntry { name: String },

    #[error("episode '{episode}' refers to missing quiz file '{file}'")]
    MissingQuizFile { episode: String, file: String },
}
