pub mod session_token;
pub mod user;

pub use session_token::SessionToken;
pub use user::{User, UserProfile};
