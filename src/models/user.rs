use super::gender::Gender;

/// Free matches granted before a subscription is required.
pub const FREE_MATCHES: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub external_id: i64,
    pub gender: Option<Gender>,
    pub subscribed: bool,
    pub chats_seen: u32,
    pub likes: u32,
    pub dislikes: u32,
}

impl User {
    /// Subscribers are never limited; everyone else gets `FREE_MATCHES`.
    pub fn can_match(&self) -> bool {
        self.subscribed || self.chats_seen < FREE_MATCHES
    }

    pub fn free_matches_left(&self) -> Option<u32> {
        if self.subscribed {
            None
        } else {
            Some(FREE_MATCHES.saturating_sub(self.chats_seen))
        }
    }
}
