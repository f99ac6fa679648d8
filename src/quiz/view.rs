//! Declarative description of what a session shows in each phase.
//!
//! The views carry no styling; front ends decide how a mark or an action
//! looks.

use super::{
    engine::QuizSession,
    score::{Score, ScoreBand},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizView {
    /// The definition has nothing to answer.
    Empty,
    Question(QuestionView),
    Results(ResultsView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub title: String,
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub feedback: Option<Feedback>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Still answering; `selected` is the pending choice.
    Selectable { selected: bool },
    Correct,
    Incorrect,
    /// Revealed, neither correct nor the wrong pick.
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Feedback attached to the chosen option.
    Choice(String),
    /// Question-level explanation.
    Explanation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit { enabled: bool },
    NextQuestion,
    ViewResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub title: String,
    pub score: Score,
    pub percentage: u32,
    pub band: ScoreBand,
    pub message: &'static str,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Submit { .. } => "Submit Answer",
            Action::NextQuestion => "Next Question",
            Action::ViewResults => "View Results",
        }
    }
}

impl Feedback {
    pub fn text(&self) -> &str {
        match self {
            Feedback::Choice(text) | Feedback::Explanation(text) => text,
        }
    }
}

impl QuizSession {
    pub fn view(&self) -> QuizView {
        if self.is_complete() {
            let score = self.score();
            return QuizView::Results(ResultsView {
                title: self.quiz().title().to_owned(),
                score,
                percentage: score.percentage(),
                band: score.band(),
                message: score.band().message(),
            });
        }

        let Some(question) = self.current_question() else {
            return QuizView::Empty;
        };
        let selected = self.selected_option_index();
        let revealed = self.is_revealed();

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let is_selected = selected == Some(index);
                let mark = if !revealed {
                    OptionMark::Selectable {
                        selected: is_selected,
                    }
                } else if option.is_correct() {
                    OptionMark::Correct
                } else if is_selected {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Locked
                };
                OptionView {
                    text: option.text().to_owned(),
                    mark,
                }
            })
            .collect();

        let feedback = if revealed {
            selected
                .and_then(|index| question.options().get(index))
                .and_then(|option| option.feedback())
                .map(|text| Feedback::Choice(text.to_owned()))
                .or_else(|| {
                    question
                        .explanation()
                        .map(|text| Feedback::Explanation(text.to_owned()))
                })
        } else {
            None
        };

        let action = match (revealed, self.is_last_question()) {
            (false, _) => Action::Submit {
                enabled: selected.is_some(),
            },
            (true, true) => Action::ViewResults,
            (true, false) => Action::NextQuestion,
        };

        QuizView::Question(QuestionView {
            title: self.quiz().title().to_owned(),
            position: self.current_question_index() + 1,
            total: self.quiz().questions().len(),
            prompt: question.prompt().to_owned(),
            options,
            feedback,
            action,
        })
    }
}
