pub mod definition;
pub mod engine;
pub mod score;
pub mod view;

pub use definition::{Question, QuizDefinition, QuizOption};
pub use engine::{AnswerRecord, CompletionHook, Phase, QuizEngine, QuizSession, Rejected, Step};
pub use score::{Score, ScoreBand};
pub use view::{Action, Feedback, OptionMark, OptionView, QuestionView, QuizView, ResultsView};
