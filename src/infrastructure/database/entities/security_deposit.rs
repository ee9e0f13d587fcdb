//! Security deposit entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "security_deposits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: String,
    pub unit_id: i32,
    pub amount_cents: i64,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_refunded: bool,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_amount_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
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
