//! Properties, rental units, amenities and listing images

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
