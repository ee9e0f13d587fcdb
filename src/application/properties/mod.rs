//! Property catalogue: properties, rental units, amenities and images

pub mod amenities;
pub mod service;

pub use amenities::DEFAULT_AMENITIES;
pub use service::{
    NewImage, NewProperty, NewUnit, PropertyChanges, PropertyDetail, PropertyListing,
    PropertyService, UnitChanges,
};
