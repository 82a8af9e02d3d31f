pub mod gender;
pub mod user;
pub mod verdict;
