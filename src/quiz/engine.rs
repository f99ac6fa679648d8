use std::{fmt, sync::Arc};

use thiserror::Error;

use super::{
    definition::{Question, QuizDefinition},
    score::Score,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering,
    Revealed,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    question_id: String,
    was_correct: bool,
}

impl AnswerRecord {
    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    pub fn was_correct(&self) -> bool {
        self.was_correct
    }
}

/// Why a transition was refused. Refusals never change the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("answer is already revealed")]
    AlreadyRevealed,
    #[error("no option selected")]
    NothingSelected,
    #[error("answer is not revealed yet")]
    NotRevealed,
    #[error("quiz is already complete")]
    AlreadyComplete,
    #[error("quiz is not complete")]
    NotComplete,
}

/// Outcome of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NextQuestion,
    Completed(Score),
}

/// One run through a quiz, from the first question to the results.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Arc<QuizDefinition>,
    current_question_index: usize,
    selected_option_index: Option<usize>,
    is_revealed: bool,
    answers: Vec<AnswerRecord>,
    is_complete: bool,
}

impl QuizSession {
    pub fn new(quiz: Arc<QuizDefinition>) -> Self {
        Self {
            quiz,
            current_question_index: 0,
            selected_option_index: None,
            is_revealed: false,
            answers: Vec::new(),
            is_complete: false,
        }
    }

    pub fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub fn phase(&self) -> Phase {
        if self.is_complete {
            Phase::Complete
        } else if self.is_revealed {
            Phase::Revealed
        } else {
            Phase::Answering
        }
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    /// `None` when the quiz has no questions.
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions().get(self.current_question_index)
    }

    pub fn selected_option_index(&self) -> Option<usize> {
        self.selected_option_index
    }

    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 == self.quiz.questions().len()
    }

    pub fn score(&self) -> Score {
        let correct = self.answers.iter().filter(|a| a.was_correct).count();
        Score::new(correct, self.quiz.questions().len())
    }

    pub fn select(&mut self, index: usize) -> Result<(), Rejected> {
        if self.is_complete {
            return Err(Rejected::AlreadyComplete);
        }
        if self.is_revealed {
            return Err(Rejected::AlreadyRevealed);
        }
        let question = self.current_question().ok_or(Rejected::NoQuestions)?;
        let len = question.options().len();
        if index >= len {
            return Err(Rejected::OptionOutOfRange { index, len });
        }

        self.selected_option_index = Some(index);
        Ok(())
    }

    /// Locks in the selection and reveals it. Returns whether it was correct.
    pub fn submit(&mut self) -> Result<bool, Rejected> {
        if self.is_complete {
            return Err(Rejected::AlreadyComplete);
        }
        if self.is_revealed {
            return Err(Rejected::AlreadyRevealed);
        }
        let selected = self.selected_option_index.ok_or(Rejected::NothingSelected)?;
        let question = self.current_question().ok_or(Rejected::NoQuestions)?;
        let option = question
            .options()
            .get(selected)
            .ok_or(Rejected::OptionOutOfRange {
                index: selected,
                len: question.options().len(),
            })?;

        let record = AnswerRecord {
            question_id: question.id().to_owned(),
            was_correct: option.is_correct(),
        };
        let was_correct = record.was_correct;
        self.answers.push(record);
        self.is_revealed = true;
        Ok(was_correct)
    }

    pub fn advance(&mut self) -> Result<Step, Rejected> {
        if self.is_complete {
            return Err(Rejected::AlreadyComplete);
        }
        if !self.is_revealed {
            return Err(Rejected::NotRevealed);
        }

        if self.is_last_question() {
            self.is_complete = true;
            return Ok(Step::Completed(self.score()));
        }

        self.current_question_index += 1;
        self.selected_option_index = None;
        self.is_revealed = false;
        Ok(Step::NextQuestion)
    }

    pub fn retry(&mut self) -> Result<(), Rejected> {
        if !self.is_complete {
            return Err(Rejected::NotComplete);
        }

        self.current_question_index = 0;
        self.selected_option_index = None;
        self.is_revealed = false;
        self.answers.clear();
        self.is_complete = false;
        Ok(())
    }
}

/// Receives the final tally once per completed run.
pub trait CompletionHook: Send + Sync {
    fn on_complete(&self, score: usize, total: usize);
}

impl<F> CompletionHook for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_complete(&self, score: usize, total: usize) {
        self(score, total)
    }
}

/// A session wired to its completion hook.
pub struct QuizEngine {
    session: QuizSession,
    on_complete: Option<Arc<dyn CompletionHook>>,
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("session", &self.session)
            .field("has_hook", &self.on_complete.is_some())
            .finish()
    }
}

impl QuizEngine {
    pub fn new(quiz: Arc<QuizDefinition>, on_complete: Option<Arc<dyn CompletionHook>>) -> Self {
        Self::resume(QuizSession::new(quiz), on_complete)
    }

    /// Picks up a session that was stored between interactions.
    pub fn resume(session: QuizSession, on_complete: Option<Arc<dyn CompletionHook>>) -> Self {
        Self {
            session,
            on_complete,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn into_session(self) -> QuizSession {
        self.session
    }

    pub fn select(&mut self, index: usize) -> Result<(), Rejected> {
        self.session.select(index)
    }

    pub fn submit(&mut self) -> Result<bool, Rejected> {
        self.session.submit()
    }

    pub fn advance(&mut self) -> Result<Step, Rejected> {
        let step = self.session.advance()?;
        if let (Step::Completed(score), Some(hook)) = (step, &self.on_complete) {
            hook.on_complete(score.correct(), score.total());
        }
        Ok(step)
    }

    pub fn retry(&mut self) -> Result<(), Rejected> {
        self.session.retry()
    }
}
