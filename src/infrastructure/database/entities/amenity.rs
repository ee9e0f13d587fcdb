//! Amenity entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "amenities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    /// Icon class name
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::property_amenity::Entity")]
    PropertyAmenities,
}

impl Related<super::property_amenity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyAmenities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
