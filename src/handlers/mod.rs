pub mod user_handlers;

pub use user_handlers::{
    delete_avatar, delete_me, get_avatar, login, logout, logout_all, me, signup, update_me,
    upload_avatar,
};
