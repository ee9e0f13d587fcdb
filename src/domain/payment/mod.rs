//! Payment aggregate
//!
//! Payments with their MPesa / bank-card records, and per-unit security
//! deposits.

pub mod model;
pub mod repository;

pub use model::{
    BankCardDetails, CardType, MpesaDetails, MpesaStatus, MpesaTransactionType, Payment,
    PaymentMethod, PaymentMethodDetails, PaymentStatus, PaymentType, SecurityDeposit,
};
pub use repository::{DepositRepository, PaymentFilter, PaymentRepository, PaymentSummary};
