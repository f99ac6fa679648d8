use std::sync::Arc;

use url::Url;

use crate::quiz::{CompletionHook, QuizDefinition, QuizEngine};

/// What a game panel hosts.
#[derive(Debug, Clone)]
pub enum PanelContent {
    /// An external game, opened by link.
    Embed { url: Url, title: String },
    Quiz { quiz: Arc<QuizDefinition> },
    Custom { content: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
pub struct GamePanel {
    content: PanelContent,
    status: PanelStatus,
}

impl GamePanel {
    pub fn new(content: PanelContent) -> Self {
        Self {
            content,
            status: PanelStatus::Loading,
        }
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn status(&self) -> PanelStatus {
        self.status
    }

    /// Called once the content has been shown.
    pub fn mark_ready(&mut self) {
        self.status = PanelStatus::Ready;
    }

    pub fn kind(&self) -> &'static str {
        match self.content {
            PanelContent::Embed { .. } => "embed",
            PanelContent::Quiz { .. } => "quiz",
            PanelContent::Custom { .. } => "custom",
        }
    }

    /// Hands the quiz and hook to a fresh engine and marks the panel ready.
    /// `None` for other content, which stays loading.
    pub fn start_quiz(
        &mut self,
        on_complete: Option<Arc<dyn CompletionHook>>,
    ) -> Option<QuizEngine> {
        let PanelContent::Quiz { quiz } = &self.content else {
            return None;
        };
        let engine = QuizEngine::new(Arc::clone(quiz), on_complete);
        self.status = PanelStatus::Ready;
        Some(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Question, QuizOption};

    #[test]
    fn test_panel_starts_loading_until_marked_ready() {
        let mut panel = GamePanel::new(PanelContent::Custom {
            content: "Coming soon".to_owned(),
        });

        assert_eq!(panel.status(), PanelStatus::Loading);
        panel.mark_ready();
        assert_eq!(panel.status(), PanelStatus::Ready);
        assert_eq!(panel.kind(), "custom");
    }

    #[test]
    fn test_quiz_panel_forwards_definition_unmodified() {
        let quiz = Arc::new(QuizDefinition::new(
            "Loops",
            "",
            vec![Question::new(
                "q1",
                "Which loops forever?",
                vec![QuizOption::new("loop {}", true), QuizOption::new("for _ in 0..1 {}", false)],
                None,
            )],
        ));
        let mut panel = GamePanel::new(PanelContent::Quiz {
            quiz: Arc::clone(&quiz),
        });
        assert_eq!(panel.status(), PanelStatus::Loading);

        let engine = panel.start_quiz(None).unwrap();

        assert!(std::ptr::eq(engine.session().quiz(), quiz.as_ref()));
        assert_eq!(panel.status(), PanelStatus::Ready);
    }

    #[test]
    fn test_embed_panel_has_no_quiz() {
        let mut panel = GamePanel::new(PanelContent::Embed {
            url: Url::parse("https://crosswordlabs.com/embed/ise-222").unwrap(),
            title: "Crossword".to_owned(),
        });

        assert!(panel.start_quiz(None).is_none());
        assert_eq!(panel.kind(), "embed");
        assert_eq!(panel.status(), PanelStatus::Loading);
    }
}
