use std::sync::Arc;

use teloxide::{
    dispatching::dialogue::GetChatId,
    payloads::{EditMessageTextSetters, SendMessageSetters},
    prelude::Requester,
    types::{CallbackQuery, ChatAction, ChatId, Message, MessageId, ParseMode, ReplyMarkup},
    Bot,
};
use tracing::instrument;

use crate::{
    catalog::{CatalogEntry, RetrieveEpisode, RetrieveQuiz},
    keyboard::{action_keyboard, embed_keyboard, view_keyboard, yes_no_keyboard, QuizCallback},
    panel::{GamePanel, PanelContent, PanelStatus},
    quiz::{CompletionHook, QuizEngine, QuizSession, QuizView, Step},
    render::{entry_intro, episode_card, view_text},
    state::QuizState,
    theme::Accent,
    HandlerResult, UserDialogue,
};

fn username(msg: &Message) -> &str {
    msg.chat.username().unwrap_or("anonymous")
}

#[instrument(level = "info", skip(bot, dialogue, catalog))]
pub(crate) async fn selection<Retriever: RetrieveQuiz>(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    catalog: Arc<Retriever>,
) -> HandlerResult {
    let Some(name) = msg.text() else {
        bot.send_message(msg.chat.id, "Failed to retrieve quiz: no input provided")
            .await?;
        return Ok(());
    };

    match catalog.retrieve_quiz(name) {
        Some(entry) => {
            tracing::info!("{} selected '{}'", username(&msg), entry.name());
            offer(&bot, &dialogue, &msg, entry).await?;
        }
        None => {
            tracing::info!("{} asked for unknown quiz '{}'", username(&msg), name);
            bot.send_message(msg.chat.id, format!("Quiz with name '{}' not found.", name))
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, catalog))]
pub(crate) async fn episode_selection<Retriever: RetrieveEpisode>(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    catalog: Arc<Retriever>,
) -> HandlerResult {
    let Some(label) = msg.text() else {
        bot.send_message(msg.chat.id, "Please choose an episode.")
            .await?;
        return Ok(());
    };

    let Some(episode) = catalog.retrieve_episode(label) else {
        bot.send_message(msg.chat.id, format!("Episode '{}' not found.", label))
            .await?;
        return Ok(());
    };

    tracing::info!("{} opened '{}'", username(&msg), episode.label());
    bot.send_message(msg.chat.id, episode_card(&episode))
        .parse_mode(ParseMode::Html)
        .reply_markup(ReplyMarkup::kb_remove())
        .await?;

    match episode.game() {
        Some(game) => offer(&bot, &dialogue, &msg, game.clone()).await?,
        None => {
            bot.send_message(msg.chat.id, "This episode has no game yet. What do you want to do now?")
                .reply_markup(action_keyboard())
                .await?;
            dialogue.update(QuizState::Start).await?;
        }
    }

    Ok(())
}

async fn offer(
    bot: &Bot,
    dialogue: &UserDialogue,
    msg: &Message,
    entry: CatalogEntry,
) -> HandlerResult {
    bot.send_message(msg.chat.id, entry_intro(&entry))
        .parse_mode(ParseMode::Html)
        .reply_markup(yes_no_keyboard())
        .await?;
    dialogue.update(QuizState::ReadyToRun { entry }).await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, entry))]
pub(crate) async fn running_ready(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    entry: CatalogEntry,
) -> HandlerResult {
    match msg.text() {
        Some("Yes") | Some("Yes✔️") => {
            let mut panel = GamePanel::new(entry.content().clone());
            tracing::info!(
                "{} starts {} '{}'",
                username(&msg),
                panel.kind(),
                entry.name()
            );
            bot.send_message(msg.chat.id, "Let's begin!")
                .reply_markup(ReplyMarkup::kb_remove())
                .await?;
            bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

            match entry.content() {
                PanelContent::Embed { url, title } => {
                    bot.send_message(msg.chat.id, format!("{} opens in your browser.", title))
                        .reply_markup(embed_keyboard(title, url))
                        .await?;
                    panel.mark_ready();
                    back_to_menu(&bot, &dialogue, &msg).await?;
                }
                PanelContent::Custom { content } => {
                    bot.send_message(msg.chat.id, content.clone()).await?;
                    panel.mark_ready();
                    back_to_menu(&bot, &dialogue, &msg).await?;
                }
                PanelContent::Quiz { .. } => {
                    // The completion hook is attached per press in `press`.
                    let Some(engine) = panel.start_quiz(None) else {
                        return Ok(());
                    };
                    let session = engine.into_session();
                    let view = session.view();
                    if view == QuizView::Empty {
                        bot.send_message(msg.chat.id, "Sorry, no questions for that quiz available.")
                            .await?;
                        back_to_menu(&bot, &dialogue, &msg).await?;
                        return Ok(());
                    }

                    let sent = bot
                        .send_message(msg.chat.id, view_text(&view, entry.accent()))
                        .parse_mode(ParseMode::Html)
                        .reply_markup(view_keyboard(&view))
                        .await?;
                    dialogue
                        .update(QuizState::Running {
                            session,
                            accent: entry.accent(),
                            message_id: sent.id,
                        })
                        .await?;
                }
            }

            if panel.status() == PanelStatus::Loading {
                tracing::warn!("{} panel for '{}' was never shown", panel.kind(), entry.name());
            }
        }
        Some("No") | Some("No❌") => {
            tracing::info!("{} quits '{}'", username(&msg), entry.name());
            bot.send_message(msg.chat.id, "OK. Quitting quiz...")
                .await?;
            back_to_menu(&bot, &dialogue, &msg).await?;
        }
        _ => {
            bot.send_message(
                msg.chat.id,
                "Please, enter a valid answer <b>Yes</b> or <b>No</b>.",
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
    }

    Ok(())
}

async fn back_to_menu(bot: &Bot, dialogue: &UserDialogue, msg: &Message) -> HandlerResult {
    dialogue.update(QuizState::Start).await?;
    bot.send_message(msg.chat.id, "What do you want to do now?")
        .reply_markup(action_keyboard())
        .await?;
    Ok(())
}

/// Removes the inline keyboard of a quiz message.
///
/// Old messages may no longer be editable, so failures are only logged.
pub(crate) async fn strip_keyboard(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    if let Err(err) = bot.edit_message_reply_markup(chat_id, message_id).await {
        tracing::debug!("could not strip keyboard of message {:?}: {}", message_id, err);
    }
}

/// Whether a button was pressed on the message that shows the session.
fn on_session_message(pressed: Option<MessageId>, session_message: MessageId) -> bool {
    pressed == Some(session_message)
}

/// Answers a button press that has no running session behind it.
#[instrument(level = "info", skip(bot, q))]
pub(crate) async fn stale_button(bot: Bot, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(&q.id).await?;
    if let (Some(chat_id), Some(message)) = (q.chat_id(), &q.message) {
        tracing::debug!("dismissing button on message {:?} without a session", message.id());
        strip_keyboard(&bot, chat_id, message.id()).await;
    }
    Ok(())
}

/// A press applied to the stored session, with the views around it.
#[derive(Debug)]
pub(crate) struct Pressed {
    pub(crate) session: QuizSession,
    pub(crate) before: QuizView,
    pub(crate) after: QuizView,
}

/// Applies one button press to a stored session.
///
/// Refused transitions are logged and leave the session as it was.
pub(crate) fn press(
    session: QuizSession,
    callback: QuizCallback,
    on_complete: Arc<dyn CompletionHook>,
    user: &str,
) -> Pressed {
    let before = session.view();
    let mut engine = QuizEngine::resume(session, Some(on_complete));
    let outcome = match callback {
        QuizCallback::Select(index) => engine.select(index),
        QuizCallback::Submit => engine.submit().map(|was_correct| {
            tracing::info!(
                "{} answered question #{} of '{}'. Correctness: {}",
                user,
                engine.session().current_question_index() + 1,
                engine.session().quiz().title(),
                was_correct
            );
        }),
        QuizCallback::Next => engine.advance().map(|step| {
            if let Step::Completed(score) = step {
                tracing::info!(
                    "{} completed '{}' with result {}%",
                    user,
                    engine.session().quiz().title(),
                    score.percentage()
                );
            }
        }),
        QuizCallback::Retry => engine.retry(),
        QuizCallback::Quit | QuizCallback::Locked => Ok(()),
    };
    if let Err(rejected) = outcome {
        tracing::debug!("ignored {} from {}: {}", callback, user, rejected);
    }

    let session = engine.into_session();
    let after = session.view();
    Pressed {
        session,
        before,
        after,
    }
}

/// Drives the running session from a button press on its message.
///
/// The new session is stored before the message is edited, so a failed
/// edit never replays a transition.
#[instrument(level = "info", skip(bot, dialogue, session, on_complete))]
pub(crate) async fn take_answer(
    bot: Bot,
    dialogue: UserDialogue,
    q: CallbackQuery,
    (session, accent, message_id): (QuizSession, Accent, MessageId),
    on_complete: Arc<dyn CompletionHook>,
) -> HandlerResult {
    bot.answer_callback_query(&q.id).await?;

    let Some(chat_id) = q.chat_id() else {
        return Ok(());
    };
    let pressed_on = q.message.as_ref().map(|message| message.id());
    if !on_session_message(pressed_on, message_id) {
        tracing::debug!("button on {:?} does not belong to message {:?}", pressed_on, message_id);
        if let Some(stale) = pressed_on {
            strip_keyboard(&bot, chat_id, stale).await;
        }
        return Ok(());
    }

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let callback = match data.parse::<QuizCallback>() {
        Ok(callback) => callback,
        Err(unknown) => {
            tracing::warn!("unknown callback data {:?}", unknown.0);
            return Ok(());
        }
    };
    let user = q.from.username.clone().unwrap_or_else(|| "anonymous".to_owned());

    if callback == QuizCallback::Quit {
        tracing::info!("{} leaves '{}'", user, session.quiz().title());
        dialogue.update(QuizState::Start).await?;
        strip_keyboard(&bot, chat_id, message_id).await;
        bot.send_message(chat_id, "What do you want to do now?")
            .reply_markup(action_keyboard())
            .await?;
        return Ok(());
    }

    let Pressed {
        session,
        before,
        after,
    } = press(session, callback, on_complete, &user);
    dialogue
        .update(QuizState::Running {
            session,
            accent,
            message_id,
        })
        .await?;

    if after != before {
        bot.edit_message_text(chat_id, message_id, view_text(&after, accent))
            .parse_mode(ParseMode::Html)
            .reply_markup(view_keyboard(&after))
            .await?;
    }

    Ok(())
}
