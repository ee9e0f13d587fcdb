//! Reservation aggregate
//!
//! Contains the UnitReservation entity, its status machine, and repository
//! interface.

pub mod model;
pub mod repository;

pub use model::{ReservationStatus, UnitReservation, DEFAULT_HOLD_HOURS};
pub use repository::ReservationRepository;
