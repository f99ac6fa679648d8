use std::{fmt, str::FromStr};

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};
use url::Url;

use crate::quiz::{Action, OptionMark, QuestionView, QuizView};

pub(crate) const TAKE_QUIZ: &str = "Take a quiz📝";
pub(crate) const EPISODES: &str = "Episodes🎧";

/// Data carried by the inline buttons of a running quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCallback {
    Select(usize),
    Submit,
    Next,
    Retry,
    Quit,
    /// A button that does nothing, e.g. an option after the reveal.
    Locked,
}

impl fmt::Display for QuizCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizCallback::Select(index) => write!(f, "select:{index}"),
            QuizCallback::Submit => f.write_str("submit"),
            QuizCallback::Next => f.write_str("next"),
            QuizCallback::Retry => f.write_str("retry"),
            QuizCallback::Quit => f.write_str("quit"),
            QuizCallback::Locked => f.write_str("locked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCallback(pub String);

impl FromStr for QuizCallback {
    type Err = UnknownCallback;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "submit" => Ok(QuizCallback::Submit),
            "next" => Ok(QuizCallback::Next),
            "retry" => Ok(QuizCallback::Retry),
            "quit" => Ok(QuizCallback::Quit),
            "locked" => Ok(QuizCallback::Locked),
            other => other
                .strip_prefix("select:")
                .and_then(|index| index.parse().ok())
                .map(QuizCallback::Select)
                .ok_or_else(|| UnknownCallback(other.to_owned())),
        }
    }
}

pub(crate) fn yes_no_keyboard() -> KeyboardMarkup {
    let keyboard: Vec<Vec<KeyboardButton>> = vec![vec![
        KeyboardButton::new("Yes✔️"),
        KeyboardButton::new("No❌"),
    ]];

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn action_keyboard() -> KeyboardMarkup {
    let keyboard = vec![vec![KeyboardButton::new(TAKE_QUIZ), KeyboardButton::new(EPISODES)]];

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn names_keyboard(names: &[String]) -> KeyboardMarkup {
    let keyboard = names.iter().map(|name| vec![KeyboardButton::new(name)]);

    KeyboardMarkup::new(keyboard)
}

fn button(text: impl Into<String>, data: QuizCallback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, data.to_string())
}

fn option_label(text: &str, mark: OptionMark) -> String {
    match mark {
        OptionMark::Selectable { selected: true } => format!("👉 {text}"),
        OptionMark::Selectable { selected: false } => text.to_owned(),
        OptionMark::Correct => format!("✅ {text}"),
        OptionMark::Incorrect => format!("❌ {text}"),
        OptionMark::Locked => text.to_owned(),
    }
}

/// One row per option, then the action row.
pub(crate) fn question_keyboard(view: &QuestionView) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = view
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let data = match option.mark {
                OptionMark::Selectable { .. } => QuizCallback::Select(index),
                _ => QuizCallback::Locked,
            };
            vec![button(option_label(&option.text, option.mark), data)]
        })
        .collect();

    let action = match view.action {
        Action::Submit { enabled: true } => button(view.action.label(), QuizCallback::Submit),
        Action::Submit { enabled: false } => {
            button(format!("🔒 {}", view.action.label()), QuizCallback::Locked)
        }
        Action::NextQuestion | Action::ViewResults => {
            button(format!("{} ➡️", view.action.label()), QuizCallback::Next)
        }
    };
    keyboard.push(vec![action]);
    keyboard.push(vec![button("Quit", QuizCallback::Quit)]);

    InlineKeyboardMarkup::new(keyboard)
}

pub(crate) fn results_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("Try Again", QuizCallback::Retry),
        button("Back to menu", QuizCallback::Quit),
    ]])
}

pub(crate) fn view_keyboard(view: &QuizView) -> InlineKeyboardMarkup {
    match view {
        QuizView::Question(question) => question_keyboard(question),
        QuizView::Results(_) => results_keyboard(),
        QuizView::Empty => InlineKeyboardMarkup::new(vec![vec![button(
            "Back to menu",
            QuizCallback::Quit,
        )]]),
    }
}

pub(crate) fn embed_keyboard(title: &str, url: &Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        format!("Play {title}"),
        url.clone(),
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::OptionView;

    fn view(marks: [OptionMark; 2], action: Action) -> QuestionView {
        QuestionView {
            title: "Quiz".to_owned(),
            position: 1,
            total: 2,
            prompt: "Pick".to_owned(),
            options: marks
                .into_iter()
                .zip(["A", "B"])
                .map(|(mark, text)| OptionView {
                    text: text.to_owned(),
                    mark,
                })
                .collect(),
            feedback: None,
            action,
        }
    }

    fn callback_data(button: &InlineKeyboardButton) -> Option<&str> {
        match &button.kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => Some(data),
            _ => None,
        }
    }

    #[test]
    fn test_callback_data_parses_back() {
        for callback in [
            QuizCallback::Select(3),
            QuizCallback::Submit,
            QuizCallback::Next,
            QuizCallback::Retry,
            QuizCallback::Quit,
            QuizCallback::Locked,
        ] {
            assert_eq!(callback.to_string().parse::<QuizCallback>(), Ok(callback));
        }
        assert!("select:x".parse::<QuizCallback>().is_err());
        assert!("bogus".parse::<QuizCallback>().is_err());
    }

    #[test]
    fn test_answering_keyboard_locks_submit_without_selection() {
        let keyboard = question_keyboard(&view(
            [
                OptionMark::Selectable { selected: false },
                OptionMark::Selectable { selected: false },
            ],
            Action::Submit { enabled: false },
        ));

        let rows = &keyboard.inline_keyboard;
        assert_eq!(rows.len(), 4);
        assert_eq!(callback_data(&rows[0][0]), Some("select:0"));
        assert_eq!(callback_data(&rows[1][0]), Some("select:1"));
        assert_eq!(callback_data(&rows[2][0]), Some("locked"));
        assert_eq!(callback_data(&rows[3][0]), Some("quit"));
    }

    #[test]
    fn test_revealed_keyboard_marks_options_and_offers_results() {
        let keyboard = question_keyboard(&view(
            [OptionMark::Incorrect, OptionMark::Correct],
            Action::ViewResults,
        ));

        let rows = &keyboard.inline_keyboard;
        assert_eq!(rows[0][0].text, "❌ A");
        assert_eq!(rows[1][0].text, "✅ B");
        assert_eq!(callback_data(&rows[0][0]), Some("locked"));
        assert_eq!(rows[2][0].text, "View Results ➡️");
        assert_eq!(callback_data(&rows[2][0]), Some("next"));
    }
}
