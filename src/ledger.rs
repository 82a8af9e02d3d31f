use log::info;

use crate::database::{self, Database};
use crate::error::{Error, Result};
use crate::models::{user::User, verdict::Verdict};

/// Marks `external_id` as subscribed. Subscribing twice changes nothing.
pub async fn subscribe(db: &Database, external_id: i64) -> Result<()> {
    db.transaction(|tx| {
        database::get_or_create_user(tx, external_id)?;
        database::set_subscribed(tx, external_id)
    })
    .await?;

    info!("User {} subscribed", external_id);
    Ok(())
}

/// Adds one like or dislike to the user known as `target` and returns the
/// updated record.
///
/// Anyone may rate any known user; the rater is not checked against the
/// target's past matches.
pub async fn rate(db: &Database, target: i64, verdict: Verdict) -> Result<User> {
    let user = db
        .transaction(|tx| {
            database::increase_rating(tx, target, verdict)?;
            database::get_user(tx, target)?.ok_or(Error::UserNotFound)
        })
        .await?;

    info!(
        "User {} got a {} ({} likes, {} dislikes)",
        target,
        verdict.token(),
        user.likes,
        user.dislikes
    );
    Ok(user)
}
