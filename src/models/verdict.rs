#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Like,
    Dislike,
}

impl Verdict {
    pub fn token(&self) -> &'static str {
        match self {
            Verdict::Like => "like",
            Verdict::Dislike => "dislike",
        }
    }

    pub(crate) fn column(&self) -> &'static str {
        match self {
            Verdict::Like => "likes",
            Verdict::Dislike => "dislikes",
        }
    }
}
