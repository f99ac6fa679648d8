use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, utils::command::BotCommands,
    Bot,
};

use crate::{
    keyboard::action_keyboard, runner::strip_keyboard, state::QuizState, HandlerResult,
    UserDialogue,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "leave the current quiz.")]
    Cancel,
    #[command(description = "start the bot.")]
    Start,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Takes the buttons off a running quiz so they cannot drive a later one.
async fn close_running(bot: &Bot, dialogue: &UserDialogue, msg: &Message) -> HandlerResult {
    if let Some(QuizState::Running { message_id, .. }) = dialogue.get().await? {
        strip_keyboard(bot, msg.chat.id, message_id).await;
    }
    Ok(())
}

pub(crate) async fn cancel(bot: Bot, dialogue: UserDialogue, msg: Message) -> HandlerResult {
    close_running(&bot, &dialogue, &msg).await?;
    bot.send_message(msg.chat.id, "Cancelling dialogue")
        .reply_markup(action_keyboard())
        .await?;
    dialogue.update(QuizState::Start).await?;
    Ok(())
}

pub(crate) async fn start(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    close_running(&bot, &dialogue, &msg).await?;
    bot.send_message(
        msg.chat.id,
        "Welcome to Beyond the Code! Please choose what to do:",
    )
    .reply_markup(action_keyboard())
    .await?;
    dialogue.update(QuizState::Start).await?;
    Ok(())
}
