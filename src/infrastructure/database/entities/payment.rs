//! Payment entity

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub payment_id: String,
    #[sea_orm(unique)]
    pub reference_number: String,
    pub tenant_id: String,
    pub unit_id: i32,
    pub property_id: i32,
    pub payment_type: String,
    pub payment_method: String,
    pub amount_cents: i64,
    pub months_paid_for: Option<i32>,
    pub rent_period_start: Option<NaiveDate>,
    pub rent_period_end: Option<NaiveDate>,
    pub status: String,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
    pub processed_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TenantId",
        to = "super::user::Column::Id"
    )]
    Tenant,
    #[sea_orm(has_one = "super::mpesa_payment::Entity")]
    Mpesa,
    #[sea_orm(has_one = "super::bank_card_payment::Entity")]
    BankCard,
}

impl Related<super::mpesa_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mpesa.def()
    }
}

impl Related<super::bank_card_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
