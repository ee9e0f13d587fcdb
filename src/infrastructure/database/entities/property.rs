//! Property entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    /// County code, e.g. `uasin_gishu`
    pub county: String,
    pub town: String,
    pub property_type: String,
    pub description: String,
    pub number_of_floors: Option<i32>,
    pub units_per_floor: Option<i32>,
    pub owner_id: String,
    pub manager_id: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::rental_unit::Entity")]
    Units,
    #[sea_orm(has_many = "super::property_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::property_amenity::Entity")]
    PropertyAmenities,
}

impl Related<super::rental_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::property_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::property_amenity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyAmenities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
