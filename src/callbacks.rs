use std::sync::Arc;

use log::warn;
use teloxide::{requests::Requester, types::CallbackQuery, Bot};

use crate::{
    config::Config, database::Database, dispatch::dispatch, event::Event, reply, HandlerResult,
};

/// Handles the `subscribe` and rating buttons.
pub async fn receive_callback(
    bot: Bot,
    q: CallbackQuery,
    db: Arc<Database>,
    config: Arc<Config>,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    // A pressed button is spent.
    if let Some(msg) = &q.message {
        if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
            warn!("Could not delete message {} in {}: {}", msg.id.0, msg.chat.id.0, e);
        }
    }

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let external_id = q.from.id.0 as i64;
    let chat_id = q.message.as_ref().map_or(external_id, |msg| msg.chat.id.0);

    match Event::callback(external_id, data) {
        Some(event) => {
            let event = event.in_chat(chat_id);
            reply::send(&bot, dispatch(&db, &config, event).await).await
        }
        None => {
            warn!("Unknown callback {:?} from {}", data, external_id);
            Ok(())
        }
    }
}
