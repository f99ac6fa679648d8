use std::sync::Arc;

use btcquizbot::catalog::Catalog;
use btcquizbot::config::Config;
use btcquizbot::quiz::CompletionHook;
use btcquizbot::schema::schema;
use btcquizbot::state::QuizState;
use dotenvy::dotenv;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

type MainResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

#[tokio::main]
async fn main() -> MainResult {
    dotenv().ok();
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_ansi(true)
        .with_line_number(true)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    // teloxide logs through `log`
    tracing_log::LogTracer::init()?;

    let catalog = Arc::new(Catalog::load(&config.content_dir)?);
    if catalog.is_empty() {
        tracing::warn!("no content found in {}", config.content_dir.display());
    }

    let on_complete: Arc<dyn CompletionHook> = Arc::new(|score: usize, total: usize| {
        tracing::info!("quiz completed: {}/{}", score, total);
    });

    let bot = Bot::new(config.token.clone());
    tracing::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![
            InMemStorage::<QuizState>::new(),
            catalog,
            on_complete
        ])
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook) = config.webhook {
        let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
        dispatcher
            .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
            .await
    } else {
        dispatcher.dispatch().await
    }

    Ok(())
}
