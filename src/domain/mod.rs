pub mod payment;
pub mod property;
pub mod repositories;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use payment::{Payment, PaymentMethod, PaymentStatus, PaymentType, SecurityDeposit};
pub use property::{Amenity, County, Property, PropertyImage, PropertyType, RentalUnit, UnitType};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{ReservationStatus, UnitReservation};
pub use user::{User, UserProfile, UserRole};

pub use crate::shared::types::errors::DomainError;
