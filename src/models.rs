pub mod auth;
pub mod document;
pub mod user;
