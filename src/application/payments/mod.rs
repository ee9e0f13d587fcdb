//! Payments: security deposits, rent and the staff payment ledger

pub mod gateway;
pub mod service;

pub use gateway::{CardAuthorization, PaymentGateway, SimulatedGateway, StkPushRequest};
pub use service::{
    CardInput, PaymentDashboard, PaymentListing, PaymentMethodInput, PaymentOptions,
    PaymentQuery, PaymentService, PaymentView, PAYMENTS_PAGE_SIZE,
};
