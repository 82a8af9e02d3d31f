use log::info;

use crate::database::{self, Database};
use crate::error::Result;
use crate::models::gender::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderOutcome {
    Set(Gender),
    Changed { from: Gender, to: Gender },
    Unchanged(Gender),
}

/// Records the gender sent by `external_id`.
///
/// Changing an already declared gender keeps `chats_seen` as it is, so
/// switching back and forth never restores free matches.
pub async fn set_gender(db: &Database, external_id: i64, requested: &str) -> Result<GenderOutcome> {
    let gender: Gender = requested.parse()?;

    let outcome = db
        .transaction(|tx| {
            let user = database::get_or_create_user(tx, external_id)?;
            let outcome = match user.gender {
                None => GenderOutcome::Set(gender),
                Some(current) if current == gender => return Ok(GenderOutcome::Unchanged(gender)),
                Some(current) => GenderOutcome::Changed {
                    from: current,
                    to: gender,
                },
            };
            database::update_user_gender(tx, external_id, gender)?;
            Ok(outcome)
        })
        .await?;

    info!("User {} gender: {:?}", external_id, outcome);
    Ok(outcome)
}
