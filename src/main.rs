mod callbacks;
mod command;
mod commands;
mod config;
mod database;
mod dispatch;
mod error;
mod event;
mod ledger;
mod matching;
mod messages;
mod models;
mod profile;
mod reply;

use std::{env, sync::Arc};

use config::{Config, ConfigError};
use database::Database;
use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    update_listeners::webhooks,
};

use crate::command::Command;

rust_i18n::i18n!("locales");

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn initialize() -> Result<Config, ConfigError> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();
    log::info!("Starting bot...");

    Config::from_env()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Arc::new(initialize()?);
    let db = Arc::new(Database::open(&config.database_path)?);

    let bot = Bot::from_env();

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![db, config.clone()])
        .enable_ctrlc_handler()
        .build();

    match &config.webhook {
        Some(webhook) => {
            log::info!("Listening for webhook calls on {}", webhook.addr);
            let options = webhooks::Options::new(webhook.addr, webhook.url.clone());
            let listener = webhooks::axum(bot, options).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            log::info!("WEBHOOK_URL is not set, using long polling");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(commands::start))
        .branch(case![Command::Help].endpoint(commands::help))
        .branch(case![Command::Find].endpoint(commands::find))
        .branch(case![Command::Profile].endpoint(commands::profile))
        .branch(case![Command::Stats].endpoint(commands::stats));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(messages::receive_gender));

    let callback_query_handler =
        Update::filter_callback_query().endpoint(callbacks::receive_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_query_handler)
}
