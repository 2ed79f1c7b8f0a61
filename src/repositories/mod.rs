pub mod token_repository;
pub mod user_repository;

pub use token_repository::{SqliteTokenRepository, TokenRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
