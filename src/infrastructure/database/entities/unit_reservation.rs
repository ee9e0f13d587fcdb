//! Unit reservation entity

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "unit_reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub unit_id: i32,
    pub tenant_id: String,
    /// pending, confirmed, cancelled, expired
    pub status: String,
    pub reservation_date: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub intended_move_in_date: NaiveDate,
    pub security_deposit_paid: bool,
    pub payment_reference: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rental_unit::Entity",
        from = "Column::UnitId",
        to = "super::rental_unit::Column::Id",
        on_delete = "Cascade"
    )]
    Unit,
}

impl Related<super::rental_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
