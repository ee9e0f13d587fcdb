//! Rental unit entity

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::Property;
use crate::domain::{DomainError, DomainResult};
use crate::shared::money::{deposit_for_rent, format_kes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitType {
    Studio,
    Bedsitter,
    OneBedroom,
    TwoBedroom,
    ThreeBedroom,
    FourPlusBedroom,
    Maisonette,
    Penthouse,
    Office,
    Shop,
    Warehouse,
    Industrial,
}

impl UnitType {
    pub const ALL: [UnitType; 12] = [
        UnitType::Studio,
        UnitType::Bedsitter,
        UnitType::OneBedroom,
        UnitType::TwoBedroom,
        UnitType::ThreeBedroom,
        UnitType::FourPlusBedroom,
        UnitType::Maisonette,
        UnitType::Penthouse,
        UnitType::Office,
        UnitType::Shop,
        UnitType::Warehouse,
        UnitType::Industrial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Studio => "studio",
            Self::Bedsitter => "bedsitter",
            Self::OneBedroom => "1br",
            Self::TwoBedroom => "2br",
            Self::ThreeBedroom => "3br",
            Self::FourPlusBedroom => "4br",
            Self::Maisonette => "maisonette",
            Self::Penthouse => "penthouse",
            Self::Office => "office",
            Self::Shop => "shop",
            Self::Warehouse => "warehouse",
            Self::Industrial => "industrial",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Studio => "Studio",
            Self::Bedsitter => "Bedsitter",
            Self::OneBedroom => "1 Bedroom",
            Self::TwoBedroom => "2 Bedroom",
            Self::ThreeBedroom => "3 Bedroom",
            Self::FourPlusBedroom => "4+ Bedroom",
            Self::Maisonette => "Maisonette",
            Self::Penthouse => "Penthouse",
            Self::Office => "Office",
            Self::Shop => "Shop",
            Self::Warehouse => "Warehouse",
            Self::Industrial => "Industrial Space",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

/// A leasable unit inside a property
#[derive(Debug, Clone)]
pub struct RentalUnit {
    pub id: i32,
    pub property_id: i32,
    pub unit_number: String,
    pub unit_type: UnitType,
    /// Monthly rent, KES
    pub rent_amount: Decimal,
    /// Always 113% of `rent_amount`
    pub deposit_amount: Decimal,
    /// Square feet
    pub floor_area: Option<i32>,
    pub floor_number: Option<i32>,
    pub is_available: bool,
    pub current_tenant_id: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentalUnit {
    /// Change the rent; the deposit follows.
    pub fn set_rent(&mut self, rent: Decimal) -> DomainResult<()> {
        if rent.is_sign_negative() {
            return Err(DomainError::Validation(
                "Rent amount cannot be negative".into(),
            ));
        }
        self.rent_amount = rent;
        self.deposit_amount = deposit_for_rent(rent);
        Ok(())
    }

    /// Availability is derived from tenancy.
    pub fn assign_tenant(&mut self, tenant_id: Option<String>) {
        self.is_available = tenant_id.is_none();
        self.current_tenant_id = tenant_id;
    }

    pub fn is_occupied(&self) -> bool {
        !self.is_available && self.current_tenant_id.is_some()
    }

    pub fn is_rented_by(&self, tenant_id: &str) -> bool {
        self.current_tenant_id.as_deref() == Some(tenant_id)
    }

    /// Check the unit's floor against its building.
    pub fn validate_against(&self, property: &Property) -> DomainResult<()> {
        if self.unit_number.trim().is_empty() {
            return Err(DomainError::Validation("Unit number is required".into()));
        }
        if self.rent_amount.is_sign_negative() {
            return Err(DomainError::Validation(
                "Rent amount cannot be negative".into(),
            ));
        }
        if let Some(area) = self.floor_area {
            if area < 0 {
                return Err(DomainError::Validation(
                    "Floor area cannot be negative".into(),
                ));
            }
        }
        if !property.is_commercial() {
            return Ok(());
        }
        let Some(floor) = self.floor_number.filter(|f| *f > 0) else {
            return Err(DomainError::Validation(
                "Floor number is required for commercial properties.".into(),
            ));
        };
        if let Some(total) = property.number_of_floors {
            if floor > total {
                return Err(DomainError::Validation(format!(
                    "Floor number cannot exceed the total number of floors ({}).",
                    total
                )));
            }
        }
        Ok(())
    }

    /// Floor 1 is the ground floor.
    pub fn floor_display(&self) -> String {
        match self.floor_number {
            Some(n) if n > 1 => format!("{} Floor", ordinal(n - 1)),
            Some(1) => "Ground Floor".to_string(),
            _ => "N/A".to_string(),
        }
    }

    pub fn display_name(&self, property: &Property) -> String {
        match self.floor_number {
            Some(floor) if property.is_commercial() && floor > 0 => format!(
                "{} - Floor {}, Unit {}",
                property.name, floor, self.unit_number
            ),
            _ => format!("{} - Unit {}", property.name, self.unit_number),
        }
    }

    pub fn rent_display(&self) -> String {
        format_kes(self.rent_amount)
    }

    pub fn deposit_display(&self) -> String {
        format_kes(self.deposit_amount)
    }
}

fn ordinal(n: i32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::{County, PropertyType};
    use std::str::FromStr;

    fn property(property_type: PropertyType, floors: Option<i32>) -> Property {
        Property {
            id: 7,
            name: "Kilimani Plaza".into(),
            address: "Argwings Kodhek Rd".into(),
            county: County::Nairobi,
            town: "Nairobi".into(),
            property_type,
            description: String::new(),
            number_of_floors: floors,
            units_per_floor: floors.map(|_| 4),
            owner_id: "owner".into(),
            manager_id: None,
            amenity_ids: vec![],
            contact_phone: None,
            contact_email: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn unit(floor: Option<i32>) -> RentalUnit {
        let mut u = RentalUnit {
            id: 1,
            property_id: 7,
            unit_number: "A1".into(),
            unit_type: UnitType::TwoBedroom,
            rent_amount: Decimal::ZERO,
            deposit_amount: Decimal::ZERO,
            floor_area: None,
            floor_number: floor,
            is_available: true,
            current_tenant_id: None,
            lease_start_date: None,
            lease_end_date: None,
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        u.set_rent(Decimal::from(50_000)).unwrap();
        u
    }

    #[test]
    fn deposit_tracks_rent() {
        let mut u = unit(None);
        assert_eq!(u.deposit_amount, Decimal::from_str("56500.00").unwrap());
        u.set_rent(Decimal::from(20_000)).unwrap();
        assert_eq!(u.deposit_amount, Decimal::from_str("22600.00").unwrap());
        assert!(u.set_rent(Decimal::from(-1)).is_err());
    }

    #[test]
    fn availability_follows_tenant() {
        let mut u = unit(None);
        assert!(u.is_available && !u.is_occupied());
        u.assign_tenant(Some("t1".into()));
        assert!(!u.is_available);
        assert!(u.is_occupied());
        assert!(u.is_rented_by("t1"));
        u.assign_tenant(None);
        assert!(u.is_available);
    }

    #[test]
    fn commercial_unit_needs_floor_within_building() {
        let p = property(PropertyType::Commercial, Some(3));
        assert!(unit(None).validate_against(&p).is_err());
        assert!(unit(Some(4)).validate_against(&p).is_err());
        assert!(unit(Some(3)).validate_against(&p).is_ok());
        let residential = property(PropertyType::Apartment, None);
        assert!(unit(None).validate_against(&residential).is_ok());
    }

    #[test]
    fn floor_display_names() {
        assert_eq!(unit(Some(1)).floor_display(), "Ground Floor");
        assert_eq!(unit(Some(2)).floor_display(), "1st Floor");
        assert_eq!(unit(Some(3)).floor_display(), "2nd Floor");
        assert_eq!(unit(Some(4)).floor_display(), "3rd Floor");
        assert_eq!(unit(Some(5)).floor_display(), "4th Floor");
        assert_eq!(unit(Some(12)).floor_display(), "11th Floor");
        assert_eq!(unit(Some(22)).floor_display(), "21st Floor");
        assert_eq!(unit(None).floor_display(), "N/A");
    }

    #[test]
    fn display_name_mentions_floor_for_commercial() {
        let commercial = property(PropertyType::Commercial, Some(3));
        assert_eq!(
            unit(Some(2)).display_name(&commercial),
            "Kilimani Plaza - Floor 2, Unit A1"
        );
        let residential = property(PropertyType::Apartment, None);
        assert_eq!(unit(Some(2)).display_name(&residential), "Kilimani Plaza - Unit A1");
    }

    #[test]
    fn money_display() {
        let u = unit(None);
        assert_eq!(u.rent_display(), "KES 50,000.00");
        assert_eq!(u.deposit_display(), "KES 56,500.00");
    }
}
