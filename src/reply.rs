use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup},
    Bot,
};

use crate::HandlerResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

/// An outgoing message. Sending it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    pub buttons: Vec<Button>,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

impl Reply {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    /// All buttons on a single row, or `None` for a plain message.
    pub fn markup(&self) -> Option<InlineKeyboardMarkup> {
        if self.buttons.is_empty() {
            return None;
        }

        let row = self
            .buttons
            .iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()));
        Some(InlineKeyboardMarkup::new([row]))
    }
}

pub async fn send(bot: &Bot, replies: Vec<Reply>) -> HandlerResult {
    for reply in replies {
        let markup = reply.markup();
        let request = bot.send_message(ChatId(reply.chat_id), reply.text);
        match markup {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };
    }

    Ok(())
}
