pub mod auth;

pub use auth::{TokenAuth, UserId};
