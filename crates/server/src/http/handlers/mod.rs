pub mod admin;
pub mod comments;
pub mod votes;
