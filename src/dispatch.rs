use log::{debug, error};
use rust_i18n::t;
use teloxide::utils::command::BotCommands;

use crate::{
    command::Command,
    config::Config,
    database::Database,
    error::{Error, Result},
    event::{rate_token, Event, Intent, SUBSCRIBE},
    ledger,
    matching::{self, Match},
    models::{user::User, verdict::Verdict},
    profile::{self, GenderOutcome},
    reply::{Button, Reply},
};

/// Runs one event against the registry and returns what to send back.
///
/// Expected failures become messages to the sender. A storage failure is
/// logged and answered with a generic retry-later message.
pub async fn dispatch(db: &Database, config: &Config, event: Event) -> Vec<Reply> {
    debug!("{:?}", event);
    let chat_id = event.chat_id;

    match handle(db, config, event).await {
        Ok(replies) => replies,
        Err(Error::Storage(e)) => {
            error!("Storage failure while serving {}: {}", chat_id, e);
            vec![Reply::text(chat_id, t!("storage_error"))]
        }
        Err(e) => vec![render_error(chat_id, &e)],
    }
}

async fn handle(db: &Database, config: &Config, event: Event) -> Result<Vec<Reply>> {
    let id = event.external_id;
    let chat_id = event.chat_id;
    let user = db.get_or_create_user(id).await?;

    let replies = match event.intent {
        Intent::Start => vec![Reply::text(chat_id, t!("welcome"))],
        Intent::Help => vec![Reply::text(chat_id, Command::descriptions().to_string())],
        Intent::SetGender => {
            let requested = event.payload.as_deref().unwrap_or_default();
            let text = match profile::set_gender(db, id, requested).await? {
                GenderOutcome::Set(gender) => t!("gender.set", gender = gender),
                GenderOutcome::Changed { from, to } => t!("gender.changed", from = from, to = to),
                GenderOutcome::Unchanged(gender) => t!("gender.unchanged", gender = gender),
            };
            vec![Reply::text(chat_id, text)]
        }
        Intent::Find => {
            let found = matching::find_partner(db, &config.owner_ids, id).await?;
            render_match(chat_id, &found)
        }
        Intent::Subscribe => {
            ledger::subscribe(db, id).await?;
            vec![Reply::text(chat_id, t!("subscribe.done"))]
        }
        Intent::Rate(verdict) => {
            let target = event
                .payload
                .as_deref()
                .and_then(|raw| raw.parse::<i64>().ok())
                .ok_or(Error::UserNotFound)?;
            ledger::rate(db, target, verdict).await?;
            vec![Reply::text(chat_id, t!("rate.thanks"))]
        }
        Intent::Profile => vec![render_profile(chat_id, &user)],
        Intent::Stats if config.is_owner(id) => {
            let stats = db.get_stats().await?;
            vec![Reply::text(
                chat_id,
                t!(
                    "stats",
                    total = stats.total,
                    males = stats.males,
                    females = stats.females,
                    subscribed = stats.subscribed
                ),
            )]
        }
        Intent::Stats => Vec::new(),
    };

    Ok(replies)
}

fn render_match(chat_id: i64, found: &Match) -> Vec<Reply> {
    let mut replies = vec![Reply::text(
        chat_id,
        t!("find.matched", gender = found.partner_gender),
    )];

    if found.disclose_id {
        replies.push(Reply::text(
            chat_id,
            t!("find.owner_view", id = found.partner_external_id),
        ));
    }

    let reactions = vec![
        Button::new("👍", rate_token(Verdict::Like, found.partner_external_id)),
        Button::new("👎", rate_token(Verdict::Dislike, found.partner_external_id)),
    ];
    replies.push(Reply::text(chat_id, t!("find.rate_prompt")).with_buttons(reactions));

    replies
}

fn render_profile(chat_id: i64, user: &User) -> Reply {
    let gender = match user.gender {
        Some(gender) => gender.to_string(),
        None => t!("profile.not_set"),
    };
    let left = match user.free_matches_left() {
        Some(left) => left.to_string(),
        None => t!("profile.unlimited"),
    };

    Reply::text(
        chat_id,
        t!(
            "profile.summary",
            gender = gender,
            left = left,
            likes = user.likes,
            dislikes = user.dislikes
        ),
    )
}

fn render_error(chat_id: i64, err: &Error) -> Reply {
    match err {
        Error::InvalidGender => Reply::text(chat_id, t!("gender.invalid")),
        Error::GenderRequired => Reply::text(chat_id, t!("gender.required")),
        Error::QuotaExceeded => Reply::text(chat_id, t!("find.quota_exceeded"))
            .with_buttons(vec![Button::new(t!("find.subscribe_button"), SUBSCRIBE)]),
        Error::NoPartnerAvailable => Reply::text(chat_id, t!("find.no_partner")),
        Error::UserNotFound => Reply::text(chat_id, t!("rate.unknown_user")),
        Error::Storage(_) => Reply::text(chat_id, t!("storage_error")),
    }
}
