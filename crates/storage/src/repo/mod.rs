mod articles;
mod comments;
mod users;
