//! Property aggregate
//!
//! Properties, their rental units, amenities and listing images.

pub mod model;
pub mod repository;
pub mod unit;

pub use model::{primary_image, Amenity, County, Property, PropertyImage, PropertyType};
pub use repository::{
    AmenityRepository, PropertyFilter, PropertyImageRepository, PropertyRepository,
    UnitRepository,
};
pub use unit::{RentalUnit, UnitType};
