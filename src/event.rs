use crate::models::verdict::Verdict;

pub const SUBSCRIBE: &str = "subscribe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    SetGender,
    Find,
    Subscribe,
    Rate(Verdict),
    Profile,
    Stats,
}

/// A normalized update: who sent it, where to answer, what they want, and
/// the argument.
///
/// `external_id` is always the sender, never the chat, so a command sent
/// from a group still acts on the sender's own record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub external_id: i64,
    pub chat_id: i64,
    pub intent: Intent,
    pub payload: Option<String>,
}

impl Event {
    pub fn new(external_id: i64, intent: Intent) -> Self {
        Self {
            external_id,
            chat_id: external_id,
            intent,
            payload: None,
        }
    }

    /// Answers go to `chat_id` instead of the sender's private chat.
    pub fn in_chat(mut self, chat_id: i64) -> Self {
        self.chat_id = chat_id;
        self
    }

    pub fn text(external_id: i64, text: &str) -> Self {
        Self {
            external_id,
            chat_id: external_id,
            intent: Intent::SetGender,
            payload: Some(text.to_owned()),
        }
    }

    /// Classifies a callback token: `subscribe`, `like_<id>` or
    /// `dislike_<id>`. Anything else is `None`.
    pub fn callback(external_id: i64, data: &str) -> Option<Self> {
        if data == SUBSCRIBE {
            return Some(Self::new(external_id, Intent::Subscribe));
        }

        let (verdict, target) = data.split_once('_')?;
        let verdict = match verdict {
            "like" => Verdict::Like,
            "dislike" => Verdict::Dislike,
            _ => return None,
        };
        Some(Self {
            external_id,
            chat_id: external_id,
            intent: Intent::Rate(verdict),
            payload: Some(target.to_owned()),
        })
    }
}

pub fn rate_token(verdict: Verdict, target: i64) -> String {
    format!("{}_{}", verdict.token(), target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_subscribe() {
        let event = Event::callback(5, "subscribe").unwrap();
        assert_eq!(event, Event::new(5, Intent::Subscribe));
    }

    #[test]
    fn classifies_ratings() {
        let event = Event::callback(5, "like_42").unwrap();
        assert_eq!(event.intent, Intent::Rate(Verdict::Like));
        assert_eq!(event.payload.as_deref(), Some("42"));

        let event = Event::callback(5, &rate_token(Verdict::Dislike, -100)).unwrap();
        assert_eq!(event.intent, Intent::Rate(Verdict::Dislike));
        assert_eq!(event.payload.as_deref(), Some("-100"));
    }

    #[test]
    fn answers_in_the_sender_chat_by_default() {
        let event = Event::new(5, Intent::Find);
        assert_eq!(event.chat_id, 5);

        let event = Event::text(5, "m").in_chat(-100);
        assert_eq!((event.external_id, event.chat_id), (5, -100));
    }

    #[test]
    fn ignores_unknown_tokens() {
        for data in ["", "cancel", "love_1", "like", "subscribe_1"] {
            assert_eq!(Event::callback(5, data), None, "{data}");
        }
    }
}
