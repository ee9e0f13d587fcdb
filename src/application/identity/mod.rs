//! Identity module: accounts, authentication and role groups
//!
//! `UserService` orchestrates every user-facing use-case. HTTP handlers
//! are thin wrappers that pass the authenticated [`Actor`](super::Actor)
//! down to it.

pub mod service;

pub use service::{AuthResult, CurrentUser, Dashboard, NewUser, Registration, UserService};
