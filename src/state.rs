use teloxide::types::MessageId;

use crate::{catalog::CatalogEntry, quiz::QuizSession, theme::Accent};

#[derive(Debug, Clone, Default)]
pub enum QuizState {
    #[default]
    Start,
    Selection,
    EpisodeSelection,
    ReadyToRun {
        entry: CatalogEntry,
    },
    /// `message_id` is the message whose buttons drive the session.
    Running {
        session: QuizSession,
        accent: Accent,
        message_id: MessageId,
    },
}
