//! Unit reservations: 24-hour holds pending a security deposit

pub mod expiry;
pub mod service;

pub use expiry::ReservationExpiryTask;
pub use service::ReservationService;
