pub mod accounts;
pub mod interactions;
pub mod notifications;

pub use accounts::{AccountService, AuthSession};
pub use interactions::{InteractionService, VERB_LIKED_POST, VERB_STARTED_FOLLOWING};
pub use notifications::NotificationService;
