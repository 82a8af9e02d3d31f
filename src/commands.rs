use std::sync::Arc;

use teloxide::{types::Message, Bot};

use crate::{
    config::Config,
    database::Database,
    dispatch::dispatch,
    event::{Event, Intent},
    reply, HandlerResult,
};

async fn run(
    bot: Bot,
    msg: Message,
    db: &Database,
    config: &Config,
    intent: Intent,
) -> HandlerResult {
    let Some(from) = msg.from() else {
        return Ok(());
    };

    let event = Event::new(from.id.0 as i64, intent).in_chat(msg.chat.id.0);
    reply::send(&bot, dispatch(db, config, event).await).await
}

pub async fn start(
    bot: Bot,
    msg: Message,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    run(bot, msg, &db, &config, Intent::Start).await
}

pub async fn help(
    bot: Bot,
    msg: Message,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    run(bot, msg, &db, &config, Intent::Help).await
}

pub async fn find(
    bot: Bot,
    msg: Message,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    run(bot, msg, &db, &config, Intent::Find).await
}

pub async fn profile(
    bot: Bot,
    msg: Message,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    run(bot, msg, &db, &config, Intent::Profile).await
}

pub async fn stats(
    bot: Bot,
    msg: Message,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    run(bot, msg, &db, &config, Intent::Stats).await
}
