pub mod comments;
pub mod follows;
pub mod likes;
pub mod notifications;
pub mod posts;
pub mod tokens;
pub mod users;

pub use comments::CommentRepository;
pub use follows::FollowRepository;
pub use likes::LikeRepository;
pub use notifications::NotificationRepository;
pub use posts::PostRepository;
pub use tokens::TokenRepository;
pub use users::UserRepository;
