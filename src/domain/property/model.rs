//! Property, amenity and image entities

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Kenyan county a property sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum County {
    Nairobi,
    Mombasa,
    Kiambu,
    Nakuru,
    Machakos,
    Kajiado,
    Kisumu,
    UasinGishu,
    Meru,
    Nyeri,
    Muranga,
    Kirinyaga,
    Embu,
    Kitui,
    Makueni,
    Other,
}

impl County {
    pub const ALL: [County; 16] = [
        County::Nairobi,
        County::Mombasa,
        County::Kiambu,
        County::Nakuru,
        County::Machakos,
        County::Kajiado,
        County::Kisumu,
        County::UasinGishu,
        County::Meru,
        County::Nyeri,
        County::Muranga,
        County::Kirinyaga,
        County::Embu,
        County::Kitui,
        County::Makueni,
        County::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nairobi => "nairobi",
            Self::Mombasa => "mombasa",
            Self::Kiambu => "kiambu",
            Self::Nakuru => "nakuru",
            Self::Machakos => "machakos",
            Self::Kajiado => "kajiado",
            Self::Kisumu => "kisumu",
            Self::UasinGishu => "uasin_gishu",
            Self::Meru => "meru",
            Self::Nyeri => "nyeri",
            Self::Muranga => "murang'a",
            Self::Kirinyaga => "kirinyaga",
            Self::Embu => "embu",
            Self::Kitui => "kitui",
            Self::Makueni => "makueni",
            Self::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nairobi => "Nairobi",
            Self::Mombasa => "Mombasa",
            Self::Kiambu => "Kiambu",
            Self::Nakuru => "Nakuru",
            Self::Machakos => "Machakos",
            Self::Kajiado => "Kajiado",
            Self::Kisumu => "Kisumu",
            Self::UasinGishu => "Uasin Gishu",
            Self::Meru => "Meru",
            Self::Nyeri => "Nyeri",
            Self::Muranga => "Murang'a",
            Self::Kirinyaga => "Kirinyaga",
            Self::Embu => "Embu",
            Self::Kitui => "Kitui",
            Self::Makueni => "Makueni",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace(' ', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key || (key == "muranga" && *c == Self::Muranga))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Townhouse,
    Studio,
    Bedsitter,
    Maisonette,
    Bungalow,
    Commercial,
    Office,
}

impl PropertyType {
    pub const ALL: [PropertyType; 10] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Villa,
        PropertyType::Townhouse,
        PropertyType::Studio,
        PropertyType::Bedsitter,
        PropertyType::Maisonette,
        PropertyType::Bungalow,
        PropertyType::Commercial,
        PropertyType::Office,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Villa => "villa",
            Self::Townhouse => "townhouse",
            Self::Studio => "studio",
            Self::Bedsitter => "bedsitter",
            Self::Maisonette => "maisonette",
            Self::Bungalow => "bungalow",
            Self::Commercial => "commercial",
            Self::Office => "office",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Office => "Office Space",
            Self::Apartment => "Apartment",
            Self::House => "House",
            Self::Villa => "Villa",
            Self::Townhouse => "Townhouse",
            Self::Studio => "Studio",
            Self::Bedsitter => "Bedsitter",
            Self::Maisonette => "Maisonette",
            Self::Bungalow => "Bungalow",
            Self::Commercial => "Commercial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

/// A building or compound offered for rent
#[derive(Debug, Clone)]
pub struct Property {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub county: County,
    pub town: String,
    pub property_type: PropertyType,
    pub description: String,
    pub number_of_floors: Option<i32>,
    pub units_per_floor: Option<i32>,
    pub owner_id: String,
    pub manager_id: Option<String>,
    pub amenity_ids: Vec<i32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn is_commercial(&self) -> bool {
        self.property_type == PropertyType::Commercial
    }

    /// Planned unit capacity; only defined for commercial buildings.
    pub fn total_units(&self) -> Option<i32> {
        match (self.is_commercial(), self.number_of_floors, self.units_per_floor) {
            (true, Some(floors), Some(per_floor)) => Some(floors * per_floor),
            _ => None,
        }
    }

    /// Commercial buildings must describe their floor layout.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("Property name is required".into()));
        }
        if self.name.chars().count() > 200 {
            return Err(DomainError::Validation(
                "Property name must be at most 200 characters".into(),
            ));
        }
        if !self.is_commercial() {
            return Ok(());
        }
        match self.number_of_floors {
            None => {
                return Err(DomainError::Validation(
                    "Number of floors is required for commercial properties.".into(),
                ))
            }
            Some(n) if n < 1 => {
                return Err(DomainError::Validation(
                    "Number of floors must be at least 1.".into(),
                ))
            }
            _ => {}
        }
        match self.units_per_floor {
            None => Err(DomainError::Validation(
                "Units per floor is required for commercial properties.".into(),
            )),
            Some(n) if n < 1 => Err(DomainError::Validation(
                "Units per floor must be at least 1.".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Facility a property offers (pool, parking, ...)
#[derive(Debug, Clone)]
pub struct Amenity {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

/// Photo attached to a property listing
#[derive(Debug, Clone)]
pub struct PropertyImage {
    pub id: i32,
    pub property_id: i32,
    pub image_path: String,
    pub caption: String,
    pub is_primary: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Pick the listing image: the primary one, else the first in display order.
pub fn primary_image(images: &[PropertyImage]) -> Option<&PropertyImage> {
    images
        .iter()
        .find(|i| i.is_primary)
        .or_else(|| images.iter().min_by_key(|i| (i.order, std::cmp::Reverse(i.created_at))))
}
