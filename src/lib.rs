use state::QuizState;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::Dialogue};

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod keyboard;
pub mod panel;
pub mod quiz;
pub mod render;
pub mod runner;
pub mod schema;
pub mod state;
pub mod theme;

type UserDialogue = Dialogue<QuizState, InMemStorage<QuizState>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
