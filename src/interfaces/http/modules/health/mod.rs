//! `GET /health`

pub mod handlers;

pub use handlers::*;
