use std::{error::Error, sync::Arc};

use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        DpHandlerDescription, UpdateFilterExt, UpdateHandler,
    },
    dptree::{self, Handler},
    payloads::SendMessageSetters,
    prelude::{DependencyMap, Requester},
    types::{Message, Update},
    Bot,
};
use tracing::instrument;

use crate::{
    catalog::{Catalog, RetrieveEpisode, RetrieveQuiz},
    commands::{cancel, help, start, Command},
    keyboard::{names_keyboard, EPISODES, TAKE_QUIZ},
    runner,
    state::QuizState,
    HandlerResult, UserDialogue,
};

type SchemeHandler = Handler<
    'static,
    DependencyMap,
    Result<(), Box<dyn Error + Send + Sync + 'static>>,
    DpHandlerDescription,
>;

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Cancel].endpoint(cancel));

    let handler = Update::filter_message()
        .branch(command_handler)
        .branch(case![QuizState::Start].endpoint(choose_what_to_do::<Catalog>))
        .branch(running_scheme())
        .endpoint(invalid_state);

    dialogue::enter::<Update, InMemStorage<QuizState>, QuizState, _>()
        .branch(handler)
        .branch(callback_query_scheme())
}

async fn choose_what_to_do<Retriever: RetrieveQuiz + RetrieveEpisode>(
    bot: Bot,
    msg: Message,
    dialogue: UserDialogue,
    catalog: Arc<Retriever>,
) -> HandlerResult {
    match msg.text() {
        Some(TAKE_QUIZ) => {
            let quizzes = catalog.retrieve_all_quiz_names();
            if quizzes.is_empty() {
                bot.send_message(msg.chat.id, "No available quizzes.")
                    .await?;
            } else {
                tracing::info!("{} chooses to take a quiz.", msg.chat.username().unwrap_or("anonymous"));
                bot.send_message(msg.chat.id, "Please, choose available quiz:")
                    .reply_markup(names_keyboard(&quizzes))
                    .await?;
                dialogue.update(QuizState::Selection).await?;
            }
        }
        Some(EPISODES) => {
            let episodes = catalog.retrieve_all_episode_labels();
            if episodes.is_empty() {
                bot.send_message(msg.chat.id, "No episodes published yet.")
                    .await?;
            } else {
                tracing::info!("{} browses episodes.", msg.chat.username().unwrap_or("anonymous"));
                bot.send_message(msg.chat.id, "Which episode?")
                    .reply_markup(names_keyboard(&episodes))
                    .await?;
                dialogue.update(QuizState::EpisodeSelection).await?;
            }
        }
        other => {
            tracing::error!(
                "Invalid message {:?} from {}",
                other,
                msg.chat.username().unwrap_or("anonymous")
            );
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "debug")]
fn running_scheme() -> SchemeHandler {
    use dptree::case;
    tracing::debug!("Building dispatching tree for runner");
    Update::filter_message()
        .branch(case![QuizState::Selection].endpoint(runner::selection::<Catalog>))
        .branch(case![QuizState::EpisodeSelection].endpoint(runner::episode_selection::<Catalog>))
        .branch(case![QuizState::ReadyToRun { entry }].endpoint(runner::running_ready))
}

#[instrument(level = "debug")]
fn callback_query_scheme() -> SchemeHandler {
    use dptree::case;
    tracing::debug!("Building dispatching tree for callback query");
    Update::filter_callback_query()
        .branch(
            case![QuizState::Running {
                session,
                accent,
                message_id
            }]
            .endpoint(runner::take_answer),
        )
        .endpoint(runner::stale_button)
}

#[instrument(level = "info", skip(bot))]
async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    tracing::info!(
        "{}: invalid input '{:?}'",
        msg.chat.username().unwrap_or("anonymous"),
        msg.text()
    );
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Enter /help to see usages.",
    )
    .await?;
    Ok(())
}
