use thiserror::Error;

/// Everything an operation on the user registry can fail with.
///
/// All variants except `Storage` are expected outcomes that end up as a
/// message to the user.
#[derive(Error, Debug)]
pub enum Error {
    #[error("gender must be M or F")]
    InvalidGender,

    #[error("gender has to be set before searching")]
    GenderRequired,

    #[error("free match quota exceeded")]
    QuotaExceeded,

    #[error("no partner available")]
    NoPartnerAvailable,

    #[error("user not found")]
    UserNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
