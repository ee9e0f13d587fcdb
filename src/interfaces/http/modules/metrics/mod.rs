//! Prometheus exposition and HTTP request metrics
//!
//! Besides the HTTP series, services emit `reservations_created_total`,
//! `reservations_expired_total`, `payments_submitted_total{type,method}`
//! and `deposits_refunded_total`.

pub mod handlers;
pub mod middleware;

pub use handlers::*;
pub use middleware::http_metrics_middleware;
