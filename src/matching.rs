use std::collections::HashSet;

use log::{debug, info};

use crate::database::{self, Database};
use crate::error::{Error, Result};
use crate::models::gender::Gender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub partner_gender: Gender,
    pub partner_external_id: i64,
    /// Whether the requester may see `partner_external_id` itself.
    pub disclose_id: bool,
}

/// Finds a partner of the opposite gender for `external_id`.
///
/// Only the requester's `chats_seen` moves; the partner's record is left
/// as it is. Owners listed in `owners` get the partner's raw id disclosed.
pub async fn find_partner(db: &Database, owners: &HashSet<i64>, external_id: i64) -> Result<Match> {
    let partner = db
        .transaction(|tx| {
            let user = database::get_or_create_user(tx, external_id)?;
            let gender = user.gender.ok_or(Error::GenderRequired)?;

            if !user.can_match() {
                debug!("User {} is out of free matches", external_id);
                return Err(Error::QuotaExceeded);
            }

            let partner = database::random_user_of_gender(tx, gender.opposite(), external_id)?
                .ok_or(Error::NoPartnerAvailable)?;
            database::increase_chats_seen(tx, external_id)?;
            Ok(partner)
        })
        .await?;

    info!("Matched {} with {}", external_id, partner.external_id);

    // `random_user_of_gender` only returns users with a declared gender.
    let partner_gender = partner.gender.ok_or(Error::NoPartnerAvailable)?;
    Ok(Match {
        partner_gender,
        partner_external_id: partner.external_id,
        disclose_id: owners.contains(&external_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::set_gender;

    async fn with_users(users: &[(i64, &str)]) -> Database {
        let db = Database::in_memory().unwrap();
        for (id, gender) in users {
            set_gender(&db, *id, gender).await.unwrap();
        }
        db
    }

    async fn set_chats_seen(db: &Database, external_id: i64, count: u32) {
        db.transaction(|tx| {
            for _ in 0..count {
                database::increase_chats_seen(tx, external_id)?;
            }
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn requires_gender() {
        let db = with_users(&[(2, "F")]).await;
        db.get_or_create_user(1).await.unwrap();

        let result = find_partner(&db, &HashSet::new(), 1).await;
        assert!(matches!(result, Err(Error::GenderRequired)));
    }

    #[tokio::test]
    async fn matches_opposite_gender_only() {
        let db = with_users(&[(1, "M"), (2, "M"), (3, "F")]).await;

        for _ in 0..4 {
            let found = find_partner(&db, &HashSet::new(), 1).await.unwrap();
            assert_eq!(found.partner_external_id, 3);
            assert_eq!(found.partner_gender, Gender::Female);
        }
    }

    #[tokio::test]
    async fn picks_among_all_candidates() {
        let db = with_users(&[(1, "F"), (2, "M"), (3, "M"), (4, "M")]).await;
        db.transaction(|tx| database::set_subscribed(tx, 1))
            .await
            .unwrap();

        for _ in 0..20 {
            let found = find_partner(&db, &HashSet::new(), 1).await.unwrap();
            assert!([2, 3, 4].contains(&found.partner_external_id));
        }
    }

    #[tokio::test]
    async fn nobody_to_match() {
        let db = with_users(&[(1, "M"), (2, "M")]).await;
        db.get_or_create_user(3).await.unwrap();

        let result = find_partner(&db, &HashSet::new(), 1).await;
        assert!(matches!(result, Err(Error::NoPartnerAvailable)));
        assert_eq!(db.get_user(1).await.unwrap().unwrap().chats_seen, 0);
    }

    #[tokio::test]
    async fn only_requester_counter_moves() {
        let db = with_users(&[(1, "M"), (2, "F")]).await;

        find_partner(&db, &HashSet::new(), 1).await.unwrap();

        assert_eq!(db.get_user(1).await.unwrap().unwrap().chats_seen, 1);
        assert_eq!(db.get_user(2).await.unwrap().unwrap().chats_seen, 0);
    }

    #[tokio::test]
    async fn fifth_free_match_is_the_last() {
        let db = with_users(&[(1, "M"), (2, "F")]).await;
        set_chats_seen(&db, 1, 4).await;

        find_partner(&db, &HashSet::new(), 1).await.unwrap();
        assert_eq!(db.get_user(1).await.unwrap().unwrap().chats_seen, 5);

        let result = find_partner(&db, &HashSet::new(), 1).await;
        assert!(matches!(result, Err(Error::QuotaExceeded)));
        assert_eq!(db.get_user(1).await.unwrap().unwrap().chats_seen, 5);
    }

    #[tokio::test]
    async fn subscribers_are_not_limited() {
        let db = with_users(&[(1, "M"), (2, "F")]).await;
        set_chats_seen(&db, 1, 10).await;
        db.transaction(|tx| database::set_subscribed(tx, 1))
            .await
            .unwrap();

        find_partner(&db, &HashSet::new(), 1).await.unwrap();
        assert_eq!(db.get_user(1).await.unwrap().unwrap().chats_seen, 11);
    }

    #[tokio::test]
    async fn quota_is_checked_before_candidates() {
        let db = with_users(&[(1, "M")]).await;
        set_chats_seen(&db, 1, 5).await;

        let result = find_partner(&db, &HashSet::new(), 1).await;
        assert!(matches!(result, Err(Error::QuotaExceeded)));
    }

    // Raw ids are an owner-only privilege; ordinary users must never get them.
    #[tokio::test]
    async fn partner_id_disclosed_to_owners_only() {
        let db = with_users(&[(1, "M"), (2, "F"), (3, "M")]).await;
        let owners = HashSet::from([3]);

        let found = find_partner(&db, &owners, 1).await.unwrap();
        assert!(!found.disclose_id);

        let found = find_partner(&db, &owners, 3).await.unwrap();
        assert!(found.disclose_id);
        assert_eq!(found.partner_external_id, 2);
    }
}
