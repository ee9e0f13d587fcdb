//! Create amenities, properties, property_amenities and property_images

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Amenities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Amenities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Amenities::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Amenities::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Amenities::Icon).string_len(50).not_null().default(""))
                    .col(
                        ColumnDef::new(Amenities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Properties::Address).text().not_null())
                    .col(ColumnDef::new(Properties::County).string_len(50).not_null())
                    .col(ColumnDef::new(Properties::Town).string_len(100).not_null())
                    .col(ColumnDef::new(Properties::PropertyType).string_len(20).not_null())
                    .col(ColumnDef::new(Properties::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Properties::NumberOfFloors).integer())
                    .col(ColumnDef::new(Properties::UnitsPerFloor).integer())
                    .col(ColumnDef::new(Properties::OwnerId).string().not_null())
                    .col(ColumnDef::new(Properties::ManagerId).string())
                    .col(ColumnDef::new(Properties::ContactPhone).string_len(15))
                    .col(ColumnDef::new(Properties::ContactEmail).string())
                    .col(
                        ColumnDef::new(Properties::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_owner")
                            .from(Properties::Table, Properties::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_manager")
                            .from(Properties::Table, Properties::ManagerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_owner")
                    .table(Properties::Table)
                    .col(Properties::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_manager")
                    .table(Properties::Table)
                    .col(Properties::ManagerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PropertyAmenities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PropertyAmenities::PropertyId).integer().not_null())
                    .col(ColumnDef::new(PropertyAmenities::AmenityId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PropertyAmenities::PropertyId)
                            .col(PropertyAmenities::AmenityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_amenities_property")
                            .from(PropertyAmenities::Table, PropertyAmenities::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_amenities_amenity")
                            .from(PropertyAmenities::Table, PropertyAmenities::AmenityId)
                            .to(Amenities::Table, Amenities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PropertyImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PropertyImages::PropertyId).integer().not_null())
                    .col(ColumnDef::new(PropertyImages::ImagePath).string().not_null())
                    .col(
                        ColumnDef::new(PropertyImages::Caption)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PropertyImages::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PropertyImages::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PropertyImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_images_property")
                            .from(PropertyImages::Table, PropertyImages::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyAmenities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Amenities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Amenities {
    Table,
    Id,
    Name,
    Description,
    Icon,
    CreatedAt,
}

#[derive(Iden)]
pub enum Properties {
    Table,
    Id,
    Name,
    Address,
    County,
    Town,
    PropertyType,
    Description,
    NumberOfFloors,
    UnitsPerFloor,
    OwnerId,
    ManagerId,
    ContactPhone,
    ContactEmail,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum PropertyAmenities {
    Table,
    PropertyId,
    AmenityId,
}

#[derive(Iden)]
pub enum PropertyImages {
    Table,
    Id,
    PropertyId,
    ImagePath,
    Caption,
    IsPrimary,
    DisplayOrder,
    CreatedAt,
}
