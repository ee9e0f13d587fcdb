//! HTTP REST API
//!
//! - `common`: response envelopes, error mapping and validated JSON
//! - `middleware`: bearer-token authentication
//! - `modules`: per-resource DTOs and handlers
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiServices};
