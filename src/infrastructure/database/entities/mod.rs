//! Database entities module

pub mod amenity;
pub mod bank_card_payment;
pub mod mpesa_payment;
pub mod payment;
pub mod property;
pub mod property_amenity;
pub mod property_image;
pub mod rental_unit;
pub mod security_deposit;
pub mod unit_reservation;
pub mod user;
pub mod user_group;
pub mod user_profile;

pub use amenity::Entity as Amenity;
pub use bank_card_payment::Entity as BankCardPayment;
pub use mpesa_payment::Entity as MpesaPayment;
pub use payment::Entity as Payment;
pub use property::Entity as Property;
pub use property_amenity::Entity as PropertyAmenity;
pub use property_image::Entity as PropertyImage;
pub use rental_unit::Entity as RentalUnit;
pub use security_deposit::Entity as SecurityDeposit;
pub use unit_reservation::Entity as UnitReservation;
pub use user::Entity as User;
pub use user_group::Entity as UserGroup;
pub use user_profile::Entity as UserProfile;
