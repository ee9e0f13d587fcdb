//! Property, unit, amenity and image DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::properties::{
    NewImage, PropertyChanges, PropertyDetail, PropertyListing, UnitChanges,
};
use crate::domain::{Amenity, County, Property, PropertyImage, PropertyType, RentalUnit, UnitType};

/// Present-but-null clears a field; absent leaves it unchanged.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Wire value for an enum with a lenient `parse`
fn parse_choice<V>(
    field: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<V>,
) -> Result<V, String> {
    parse(value).ok_or_else(|| format!("Unknown {} '{}'", field, value))
}

fn parse_optional<V>(
    field: &str,
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Option<V>,
) -> Result<Option<V>, String> {
    value.map(|v| parse_choice(field, v, parse)).transpose()
}

// ── Properties ──────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Stored county code, e.g. `nairobi`
    pub county: String,
    pub county_display: String,
    pub town: String,
    pub property_type: String,
    pub property_type_display: String,
    pub description: String,
    pub number_of_floors: Option<i32>,
    pub units_per_floor: Option<i32>,
    /// Floors times units per floor, when both are known
    pub total_units: Option<i32>,
    pub is_commercial: bool,
    pub owner_id: String,
    pub manager_id: Option<String>,
    pub amenity_ids: Vec<i32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Property> for PropertyDto {
    fn from(p: Property) -> Self {
        Self {
            county: p.county.as_str().to_string(),
            county_display: p.county.display_name().to_string(),
            property_type: p.property_type.as_str().to_string(),
            property_type_display: p.property_type.display_name().to_string(),
            total_units: p.total_units(),
            is_commercial: p.is_commercial(),
            id: p.id,
            name: p.name,
            address: p.address,
            town: p.town,
            description: p.description,
            number_of_floors: p.number_of_floors,
            units_per_floor: p.units_per_floor,
            owner_id: p.owner_id,
            manager_id: p.manager_id,
            amenity_ids: p.amenity_ids,
            contact_phone: p.contact_phone,
            contact_email: p.contact_email,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyListingDto {
    pub property: PropertyDto,
    pub primary_image: Option<ImageDto>,
    pub total_units: usize,
    pub available_units: usize,
}

impl From<PropertyListing> for PropertyListingDto {
    fn from(l: PropertyListing) -> Self {
        Self {
            property: l.property.into(),
            primary_image: l.primary_image.map(ImageDto::from),
            total_units: l.total_units,
            available_units: l.available_units,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyDetailDto {
    pub property: PropertyDto,
    pub amenities: Vec<AmenityDto>,
    pub images: Vec<ImageDto>,
    pub units: Vec<UnitDto>,
}

impl From<PropertyDetail> for PropertyDetailDto {
    fn from(d: PropertyDetail) -> Self {
        Self {
            property: d.property.into(),
            amenities: d.amenities.into_iter().map(AmenityDto::from).collect(),
            images: d.images.into_iter().map(ImageDto::from).collect(),
            units: d.units.into_iter().map(UnitDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    /// County code or name, e.g. `nairobi` or `Nairobi`
    pub county: String,
    #[validate(length(min = 1, max = 100, message = "town must be 1-100 characters"))]
    pub town: String,
    /// `apartment`, `house`, `bedsitter`, ...
    pub property_type: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, message = "number_of_floors must be positive"))]
    pub number_of_floors: Option<i32>,
    #[validate(range(min = 1, message = "units_per_floor must be positive"))]
    pub units_per_floor: Option<i32>,
    #[serde(default)]
    pub amenity_ids: Vec<i32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub manager_id: Option<String>,
    pub image: Option<AddImageRequest>,
}

impl CreatePropertyRequest {
    pub fn into_new(self) -> Result<crate::application::properties::NewProperty, String> {
        Ok(crate::application::properties::NewProperty {
            county: parse_choice("county", &self.county, County::parse)?,
            property_type: parse_choice("property type", &self.property_type, PropertyType::parse)?,
            name: self.name,
            address: self.address,
            town: self.town,
            description: self.description,
            number_of_floors: self.number_of_floors,
            units_per_floor: self.units_per_floor,
            amenity_ids: self.amenity_ids,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            manager_id: self.manager_id,
            image: self.image.map(AddImageRequest::into_new),
        })
    }
}

/// Partial update; `null` clears optional fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    pub property_type: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub number_of_floors: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub units_per_floor: Option<Option<i32>>,
    pub amenity_ids: Option<Vec<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub contact_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub contact_email: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdatePropertyRequest {
    pub fn into_changes(self) -> Result<PropertyChanges, String> {
        Ok(PropertyChanges {
            county: parse_optional("county", self.county.as_deref(), County::parse)?,
            property_type: parse_optional(
                "property type",
                self.property_type.as_deref(),
                PropertyType::parse,
            )?,
            name: self.name,
            address: self.address,
            town: self.town,
            description: self.description,
            number_of_floors: self.number_of_floors,
            units_per_floor: self.units_per_floor,
            amenity_ids: self.amenity_ids,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignManagerRequest {
    /// `null` removes the manager
    pub manager_id: Option<String>,
}

// ── Images ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageDto {
    pub id: i32,
    pub property_id: i32,
    pub image_path: String,
    pub caption: String,
    pub is_primary: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<PropertyImage> for ImageDto {
    fn from(i: PropertyImage) -> Self {
        Self {
            id: i.id,
            property_id: i.property_id,
            image_path: i.image_path,
            caption: i.caption,
            is_primary: i.is_primary,
            order: i.order,
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddImageRequest {
    #[validate(length(min = 1, message = "image_path is required"))]
    pub image_path: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: i32,
}

impl AddImageRequest {
    pub fn into_new(self) -> NewImage {
        NewImage {
            image_path: self.image_path,
            caption: self.caption,
            is_primary: self.is_primary,
            order: self.order,
        }
    }
}

// ── Units ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct UnitDto {
    pub id: i32,
    pub property_id: i32,
    pub unit_number: String,
    pub unit_type: String,
    pub unit_type_display: String,
    /// Monthly rent in KES
    #[schema(value_type = String)]
    pub rent_amount: Decimal,
    /// Always 113% of rent
    #[schema(value_type = String)]
    pub deposit_amount: Decimal,
    pub rent_display: String,
    pub deposit_display: String,
    pub floor_area: Option<i32>,
    pub floor_number: Option<i32>,
    pub floor_display: String,
    pub is_available: bool,
    pub current_tenant_id: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RentalUnit> for UnitDto {
    fn from(u: RentalUnit) -> Self {
        Self {
            unit_type: u.unit_type.as_str().to_string(),
            unit_type_display: u.unit_type.display_name().to_string(),
            rent_display: u.rent_display(),
            deposit_display: u.deposit_display(),
            floor_display: u.floor_display(),
            id: u.id,
            property_id: u.property_id,
            unit_number: u.unit_number,
            rent_amount: u.rent_amount,
            deposit_amount: u.deposit_amount,
            floor_area: u.floor_area,
            floor_number: u.floor_number,
            is_available: u.is_available,
            current_tenant_id: u.current_tenant_id,
            lease_start_date: u.lease_start_date,
            lease_end_date: u.lease_end_date,
            description: u.description,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// A unit with the name of its property
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitDetailDto {
    /// e.g. `Unit 4B - Kilimani Court`
    pub display_name: String,
    pub unit: UnitDto,
    pub property: PropertyDto,
}

impl From<(RentalUnit, Property)> for UnitDetailDto {
    fn from((unit, property): (RentalUnit, Property)) -> Self {
        Self {
            display_name: unit.display_name(&property),
            unit: unit.into(),
            property: property.into(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UnitsQuery {
    pub property_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUnitRequest {
    pub property_id: i32,
    #[validate(length(min = 1, max = 20, message = "unit_number must be 1-20 characters"))]
    pub unit_number: String,
    /// `studio`, `1br`, `shop`, ...
    pub unit_type: String,
    #[schema(value_type = String, example = "25000.00")]
    pub rent_amount: Decimal,
    #[validate(range(min = 1, message = "floor_area must be positive"))]
    pub floor_area: Option<i32>,
    #[validate(range(min = 0, message = "floor_number cannot be negative"))]
    pub floor_number: Option<i32>,
    pub current_tenant_id: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl CreateUnitRequest {
    pub fn into_new(self) -> Result<crate::application::properties::NewUnit, String> {
        Ok(crate::application::properties::NewUnit {
            unit_type: parse_choice("unit type", &self.unit_type, UnitType::parse)?,
            property_id: self.property_id,
            unit_number: self.unit_number,
            rent_amount: self.rent_amount,
            floor_area: self.floor_area,
            floor_number: self.floor_number,
            current_tenant_id: self.current_tenant_id,
            lease_start_date: self.lease_start_date,
            lease_end_date: self.lease_end_date,
            description: self.description,
        })
    }
}

/// Partial update; `null` clears optional fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUnitRequest {
    #[validate(length(min = 1, max = 20, message = "unit_number must be 1-20 characters"))]
    pub unit_number: Option<String>,
    pub unit_type: Option<String>,
    #[schema(value_type = Option<String>)]
    pub rent_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub floor_area: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub floor_number: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub current_tenant_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>)]
    pub lease_start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>)]
    pub lease_end_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
}

impl UpdateUnitRequest {
    pub fn into_changes(self) -> Result<UnitChanges, String> {
        Ok(UnitChanges {
            unit_type: parse_optional("unit type", self.unit_type.as_deref(), UnitType::parse)?,
            unit_number: self.unit_number,
            rent_amount: self.rent_amount,
            floor_area: self.floor_area,
            floor_number: self.floor_number,
            current_tenant_id: self.current_tenant_id,
            lease_start_date: self.lease_start_date,
            lease_end_date: self.lease_end_date,
            description: self.description,
        })
    }
}

// ── Amenities ───────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct AmenityDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl From<Amenity> for AmenityDto {
    fn from(a: Amenity) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            icon: a.icon,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAmenityRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clears_and_absent_keeps() {
        let req: UpdateUnitRequest =
            serde_json::from_str(r#"{"floor_number": null, "rent_amount": "30000"}"#).unwrap();
        assert_eq!(req.floor_number, Some(None));
        assert_eq!(req.floor_area, None);
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.rent_amount, Some(Decimal::new(30000, 0)));
        assert_eq!(changes.floor_number, Some(None));
    }

    #[test]
    fn unknown_choices_are_reported() {
        let req: CreateUnitRequest = serde_json::from_str(
            r#"{"property_id": 1, "unit_number": "A1", "unit_type": "castle", "rent_amount": 1000}"#,
        )
        .unwrap();
        assert_eq!(req.into_new().unwrap_err(), "Unknown unit type 'castle'");

        let req: UpdatePropertyRequest = serde_json::from_str(r#"{"county": "Atlantis"}"#).unwrap();
        assert_eq!(req.into_changes().unwrap_err(), "Unknown county 'Atlantis'");
    }
}
