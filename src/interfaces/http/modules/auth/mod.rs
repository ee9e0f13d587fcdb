//! Authentication endpoints: register, login, current user, password

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
