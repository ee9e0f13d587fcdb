//! Application layer: use-cases over the domain repositories
//!
//! Every service receives the calling [`Actor`] and enforces role and
//! property-scope rules itself.

pub mod access;
mod actor;
pub mod identity;
pub mod payments;
pub mod properties;
pub mod reservations;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{Actor, STAFF};
pub use identity::UserService;
pub use payments::PaymentService;
pub use properties::PropertyService;
pub use reservations::{ReservationExpiryTask, ReservationService};
