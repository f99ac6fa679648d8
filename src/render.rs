//! HTML message bodies for the bot.

use std::fmt::Write;

use teloxide::utils::html::escape;

use crate::{
    catalog::{CatalogEntry, EpisodeEntry},
    quiz::{Feedback, QuestionView, QuizView, ResultsView},
    theme::Accent,
};

pub(crate) fn view_text(view: &QuizView, accent: Accent) -> String {
    match view {
        QuizView::Empty => "This quiz has no questions yet.".to_owned(),
        QuizView::Question(question) => question_text(question, accent),
        QuizView::Results(results) => results_text(results, accent),
    }
}

fn question_text(view: &QuestionView, accent: Accent) -> String {
    let mut text = format!(
        "{} <b>{}</b>\n<i>Question {} of {}</i>\n\n{}",
        accent.marker(),
        escape(&view.title),
        view.position,
        view.total,
        escape(&view.prompt)
    );

    if let Some(feedback) = &view.feedback {
        let label = match feedback {
            Feedback::Choice(_) => "Your choice:",
            Feedback::Explanation(_) => "Explanation:",
        };
        let _ = write!(text, "\n\n<b>{label}</b> {}", escape(feedback.text()));
    }

    text
}

fn results_text(view: &ResultsView, accent: Accent) -> String {
    format!(
        "{} <b>Quiz Complete!</b>\n{}\n\n<b>{}%</b>\n\nCorrect: {}\nIncorrect: {}\nTotal: {}\n\n{}",
        accent.marker(),
        escape(&view.title),
        view.percentage,
        view.score.correct(),
        view.score.incorrect(),
        view.score.total(),
        view.message
    )
}

/// Title card shown before a game starts.
pub(crate) fn entry_intro(entry: &CatalogEntry) -> String {
    let mut text = format!(
        "{} <b>{}</b>\n<i>{}</i>",
        entry.accent().marker(),
        escape(entry.name()),
        escape(entry.description())
    );

    let details: Vec<String> = [("Difficulty", entry.difficulty()), ("Category", entry.category())]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {}", escape(v))))
        .collect();
    if !details.is_empty() {
        let _ = write!(text, "\n{}", details.join(" · "));
    }

    if !entry.instructions().is_empty() {
        text.push_str("\n\n<b>How to Play</b>");
        for (i, step) in entry.instructions().iter().enumerate() {
            let _ = write!(text, "\n{}. {}", i + 1, escape(step));
        }
    }

    text.push_str("\n\nAre you ready to begin? (Yes/No)");
    text
}

pub(crate) fn episode_card(entry: &EpisodeEntry) -> String {
    let episode = entry.episode();
    let mut text = format!(
        "{} <b>{}</b>\n\n{}",
        episode.accent().marker(),
        escape(&entry.label()),
        escape(episode.description())
    );

    for (label, value) in [
        ("Host", episode.host()),
        ("Guest", episode.guest()),
        ("Credits", episode.credits()),
    ] {
        if let Some(value) = value {
            let _ = write!(text, "\n<b>{label}:</b> {}", escape(value));
        }
    }

    if !episode.references().is_empty() {
        text.push_str("\n\n<b>References</b>");
        for (i, reference) in episode.references().iter().enumerate() {
            let _ = write!(text, "\n{}. {}", i + 1, escape(reference));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::quiz::{Question, QuizDefinition, QuizOption, QuizSession};

    fn session() -> QuizSession {
        QuizSession::new(Arc::new(QuizDefinition::new(
            "Rust <3",
            "",
            vec![Question::new(
                "q1",
                "Line one\nLine two",
                vec![QuizOption::new("a", true), QuizOption::new("b", false)],
                Some("Because & so.".to_owned()),
            )],
        )))
    }

    #[test]
    fn test_question_text_escapes_and_keeps_line_breaks() {
        let text = view_text(&session().view(), Accent::Purple);

        assert!(text.starts_with("🟪 <b>Rust &lt;3</b>"));
        assert!(text.contains("Question 1 of 1"));
        assert!(text.contains("Line one\nLine two"));
        assert!(!text.contains("Explanation"));
    }

    #[test]
    fn test_revealed_text_shows_explanation() {
        let mut session = session();
        session.select(1).unwrap();
        session.submit().unwrap();

        let text = view_text(&session.view(), Accent::Yellow);

        assert!(text.ends_with("<b>Explanation:</b> Because &amp; so."));
    }

    #[test]
    fn test_results_text_has_breakdown() {
        let mut session = session();
        session.select(0).unwrap();
        session.submit().unwrap();
        session.advance().unwrap();

        let text = view_text(&session.view(), Accent::Yellow);

        assert!(text.contains("<b>100%</b>"));
        assert!(text.contains("Correct: 1\nIncorrect: 0\nTotal: 1"));
        assert!(text.ends_with("Excellent work! You've mastered this topic!"));
    }
}
