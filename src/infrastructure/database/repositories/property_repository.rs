//! Properties, amenities and listing images

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{db_err, unique_or_db_err};
use crate::domain::property::{
    Amenity, AmenityRepository, County, Property, PropertyFilter, PropertyImage,
    PropertyImageRepository, PropertyRepository, PropertyType,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    amenity, property, property_amenity, property_image,
};

// ── Conversion helpers ──────────────────────────────────────────

fn property_model_to_domain(model: property::Model, amenity_ids: Vec<i32>) -> Property {
    Property {
        id: model.id,
        name: model.name,
        address: model.address,
        county: County::parse(&model.county).unwrap_or(County::Other),
        town: model.town,
        property_type: PropertyType::parse(&model.property_type)
            .unwrap_or(PropertyType::Apartment),
        description: model.description,
        number_of_floors: model.number_of_floors,
        units_per_floor: model.units_per_floor,
        owner_id: model.owner_id,
        manager_id: model.manager_id,
        amenity_ids,
        contact_phone: model.contact_phone,
        contact_email: model.contact_email,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn amenity_model_to_domain(model: amenity::Model) -> Amenity {
    Amenity {
        id: model.id,
        name: model.name,
        description: model.description,
        icon: model.icon,
        created_at: model.created_at,
    }
}

fn image_model_to_domain(model: property_image::Model) -> PropertyImage {
    PropertyImage {
        id: model.id,
        property_id: model.property_id,
        image_path: model.image_path,
        caption: model.caption,
        is_primary: model.is_primary,
        order: model.display_order,
        created_at: model.created_at,
    }
}

async fn replace_amenities<C: ConnectionTrait>(
    db: &C,
    property_id: i32,
    amenity_ids: &[i32],
) -> DomainResult<()> {
    property_amenity::Entity::delete_many()
        .filter(property_amenity::Column::PropertyId.eq(property_id))
        .exec(db)
        .await
        .map_err(db_err)?;

    if amenity_ids.is_empty() {
        return Ok(());
    }

    let mut ids = amenity_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    property_amenity::Entity::insert_many(ids.into_iter().map(|amenity_id| {
        property_amenity::ActiveModel {
            property_id: Set(property_id),
            amenity_id: Set(amenity_id),
        }
    }))
    .exec_without_returning(db)
    .await
    .map_err(db_err)?;

    Ok(())
}

// ── Properties ──────────────────────────────────────────────────

pub struct SeaOrmPropertyRepository {
    db: DatabaseConnection,
}

impl SeaOrmPropertyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn amenity_links(&self, property_ids: &[i32]) -> DomainResult<HashMap<i32, Vec<i32>>> {
        let links = property_amenity::Entity::find()
            .filter(property_amenity::Column::PropertyId.is_in(property_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
        for link in links {
            map.entry(link.property_id).or_default().push(link.amenity_id);
        }
        Ok(map)
    }
}

#[async_trait]
impl PropertyRepository for SeaOrmPropertyRepository {
    async fn create(&self, p: Property) -> DomainResult<Property> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = property::ActiveModel {
            name: Set(p.name),
            address: Set(p.address),
            county: Set(p.county.as_str().to_string()),
            town: Set(p.town),
            property_type: Set(p.property_type.as_str().to_string()),
            description: Set(p.description),
            number_of_floors: Set(p.number_of_floors),
            units_per_floor: Set(p.units_per_floor),
            owner_id: Set(p.owner_id),
            manager_id: Set(p.manager_id),
            contact_phone: Set(p.contact_phone),
            contact_email: Set(p.contact_email),
            is_active: Set(p.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        replace_amenities(&txn, model.id, &p.amenity_ids).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(property_model_to_domain(model, p.amenity_ids))
    }

    async fn update(&self, p: Property) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = property::Entity::find_by_id(p.id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Property", "id", p.id))?;

        let mut active: property::ActiveModel = existing.into();
        active.name = Set(p.name);
        active.address = Set(p.address);
        active.county = Set(p.county.as_str().to_string());
        active.town = Set(p.town);
        active.property_type = Set(p.property_type.as_str().to_string());
        active.description = Set(p.description);
        active.number_of_floors = Set(p.number_of_floors);
        active.units_per_floor = Set(p.units_per_floor);
        active.owner_id = Set(p.owner_id);
        active.manager_id = Set(p.manager_id);
        active.contact_phone = Set(p.contact_phone);
        active.contact_email = Set(p.contact_email);
        active.is_active = Set(p.is_active);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(db_err)?;

        replace_amenities(&txn, p.id, &p.amenity_ids).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Property>> {
        let Some(model) = property::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut links = self.amenity_links(&[id]).await?;
        let amenity_ids = links.remove(&id).unwrap_or_default();
        Ok(Some(property_model_to_domain(model, amenity_ids)))
    }

    async fn list(&self, filter: PropertyFilter) -> DomainResult<Vec<Property>> {
        let mut query = property::Entity::find();

        if filter.active_only {
            query = query.filter(property::Column::IsActive.eq(true));
        }
        if let Some(ref owner_id) = filter.owner_id {
            query = query.filter(property::Column::OwnerId.eq(owner_id.as_str()));
        }
        if let Some(ref manager_id) = filter.manager_id {
            query = query.filter(property::Column::ManagerId.eq(manager_id.as_str()));
        }
        if let Some(ref ids) = filter.ids {
            query = query.filter(property::Column::Id.is_in(ids.iter().copied()));
        }

        let models = query
            .order_by_desc(property::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut links = self.amenity_links(&ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let amenity_ids = links.remove(&m.id).unwrap_or_default();
                property_model_to_domain(m, amenity_ids)
            })
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        property::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

// ── Amenities ───────────────────────────────────────────────────

pub struct SeaOrmAmenityRepository {
    db: DatabaseConnection,
}

impl SeaOrmAmenityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AmenityRepository for SeaOrmAmenityRepository {
    async fn create(&self, a: Amenity) -> DomainResult<Amenity> {
        let model = amenity::ActiveModel {
            name: Set(a.name),
            description: Set(a.description),
            icon: Set(a.icon),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_or_db_err(e, "Amenity with this name already exists"))?;

        Ok(amenity_model_to_domain(model))
    }

    async fn list_all(&self) -> DomainResult<Vec<Amenity>> {
        let models = amenity::Entity::find()
            .order_by_asc(amenity::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(amenity_model_to_domain).collect())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Amenity>> {
        let model = amenity::Entity::find()
            .filter(amenity::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(amenity_model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Amenity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = amenity::Entity::find()
            .filter(amenity::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(amenity::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(amenity_model_to_domain).collect())
    }
}

// ── Images ──────────────────────────────────────────────────────

pub struct SeaOrmPropertyImageRepository {
    db: DatabaseConnection,
}

impl SeaOrmPropertyImageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertyImageRepository for SeaOrmPropertyImageRepository {
    async fn add(&self, image: PropertyImage) -> DomainResult<PropertyImage> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if image.is_primary {
            property_image::Entity::update_many()
                .col_expr(
                    property_image::Column::IsPrimary,
                    sea_orm::sea_query::Expr::value(false),
                )
                .filter(property_image::Column::PropertyId.eq(image.property_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        let model = property_image::ActiveModel {
            property_id: Set(image.property_id),
            image_path: Set(image.image_path),
            caption: Set(image.caption),
            is_primary: Set(image.is_primary),
            display_order: Set(image.order),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(image_model_to_domain(model))
    }

    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<PropertyImage>> {
        let models = property_image::Entity::find()
            .filter(property_image::Column::PropertyId.eq(property_id))
            .order_by_asc(property_image::Column::DisplayOrder)
            .order_by_desc(property_image::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(image_model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PropertyImage>> {
        let model = property_image::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(image_model_to_domain))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = property_image::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("PropertyImage", "id", id));
        }
        Ok(())
    }
}
