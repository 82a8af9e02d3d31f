use std::sync::Arc;

use teloxide::{types::Message, Bot};

use crate::{
    config::Config, database::Database, dispatch::dispatch, event::Event, reply, HandlerResult,
};

/// Any plain text that is not a command is taken as a gender answer.
pub async fn receive_gender(
    bot: Bot,
    msg: Message,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    let (Some(from), Some(text)) = (msg.from(), msg.text()) else {
        return Ok(());
    };

    let event = Event::text(from.id.0 as i64, text).in_chat(msg.chat.id.0);
    reply::send(&bot, dispatch(&db, &config, event).await).await
}
