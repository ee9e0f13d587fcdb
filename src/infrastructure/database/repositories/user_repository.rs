use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, unique_or_db_err};
use crate::domain::user::{
    group_for, CreateUserDto, GetUserDto, Language, UpdateUserDto, User, UserProfile,
    UserRepository, UserRole,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{user, user_group, user_profile};
use crate::shared::{validate_pagination, PaginatedResult};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::PropertyManager => UserRole::PropertyManager,
        user::UserRole::Landlord => UserRole::Landlord,
        user::UserRole::Tenant => UserRole::Tenant,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::PropertyManager => user::UserRole::PropertyManager,
        UserRole::Landlord => user::UserRole::Landlord,
        UserRole::Tenant => user::UserRole::Tenant,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        phone_number: model.phone_number,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

fn profile_model_to_domain(model: user_profile::Model) -> UserProfile {
    UserProfile {
        user_id: model.user_id,
        date_of_birth: model.date_of_birth,
        national_id: model.national_id,
        county: model.county,
        town: model.town,
        address: model.address,
        emergency_contact_name: model.emergency_contact_name,
        emergency_contact_phone: model.emergency_contact_phone,
        preferred_language: Language::parse(&model.preferred_language).unwrap_or_default(),
        email_notifications: model.email_notifications,
        sms_notifications: model.sms_notifications,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn profile_to_active(profile: UserProfile) -> user_profile::ActiveModel {
    user_profile::ActiveModel {
        user_id: Set(profile.user_id),
        date_of_birth: Set(profile.date_of_birth),
        national_id: Set(profile.national_id),
        county: Set(profile.county),
        town: Set(profile.town),
        address: Set(profile.address),
        emergency_contact_name: Set(profile.emergency_contact_name),
        emergency_contact_phone: Set(profile.emergency_contact_phone),
        preferred_language: Set(profile.preferred_language.as_str().to_string()),
        email_notifications: Set(profile.email_notifications),
        sms_notifications: Set(profile.sms_notifications),
        created_at: Set(profile.created_at),
        updated_at: Set(profile.updated_at),
    }
}

const USER_CONFLICT: &str = "Username, email or phone number already exists";

/// Replace every group membership of `user_id` with the role's group.
async fn assign_group<C: ConnectionTrait>(db: &C, user_id: &str, role: UserRole) -> DomainResult<()> {
    user_group::Entity::delete_many()
        .filter(user_group::Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(db_err)?;

    user_group::ActiveModel {
        user_id: Set(user_id.to_string()),
        group_name: Set(group_for(role).name().to_string()),
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();

        let txn = self.db.begin().await.map_err(db_err)?;

        let model = user::ActiveModel {
            id: Set(id.clone()),
            username: Set(dto.username),
            email: Set(dto.email),
            first_name: Set(dto.first_name),
            last_name: Set(dto.last_name),
            phone_number: Set(dto.phone_number.filter(|p| !p.is_empty())),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| unique_or_db_err(e, USER_CONFLICT))?;

        profile_to_active(UserProfile::empty(&id))
            .insert(&txn)
            .await
            .map_err(db_err)?;

        assign_group(&txn, &id, dto.role).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let (page, page_size) = validate_pagination(dto.page, dto.page_size, 20);

        let mut query = user::Entity::find();

        if let Some(ref search) = dto.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Username.contains(search))
                    .add(user::Column::Email.contains(search))
                    .add(user::Column::FirstName.contains(search))
                    .add(user::Column::LastName.contains(search)),
            );
        }

        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        if let Some(ref roles) = dto.roles_in {
            query = query.filter(
                user::Column::Role.is_in(roles.iter().map(|r| domain_role_to_entity(*r))),
            );
        }

        if let Some(ref only_id) = dto.only_id {
            query = query.filter(user::Column::Id.eq(only_id.as_str()));
        }

        query = match dto.sort_by.as_deref() {
            Some("username") => query.order_by_asc(user::Column::Username),
            Some("email") => query.order_by_asc(user::Column::Email),
            Some("role") => query.order_by_asc(user::Column::Role),
            Some("last_name") => query.order_by_asc(user::Column::LastName),
            _ => query.order_by_desc(user::Column::CreatedAt),
        };

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = ((page - 1) * page_size) as u64;
        let models = query
            .offset(offset)
            .limit(page_size as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<User> = models.into_iter().map(user_model_to_domain).collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_phone(&self, phone: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::PhoneNumber.eq(phone))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn search_user_ids(&self, search: &str) -> DomainResult<Vec<String>> {
        let ids = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(
                Condition::any()
                    .add(user::Column::FirstName.contains(search))
                    .add(user::Column::LastName.contains(search))
                    .add(user::Column::Username.contains(search)),
            )
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(ids)
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let role_changed = dto
            .role
            .is_some_and(|r| domain_role_to_entity(r) != existing.role);

        let mut active: user::ActiveModel = existing.into();

        if let Some(username) = dto.username {
            active.username = Set(username);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(first_name) = dto.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = dto.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = dto.phone_number {
            active.phone_number = Set(phone.filter(|p| !p.is_empty()));
        }
        if let Some(role) = dto.role {
            active.role = Set(domain_role_to_entity(role));
        }
        if let Some(is_active) = dto.is_active {
            active.is_active = Set(is_active);
        }

        active.updated_at = Set(Utc::now());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| unique_or_db_err(e, USER_CONFLICT))?;

        if role_changed {
            assign_group(&txn, id, entity_role_to_domain(updated.role)).await?;
        }

        txn.commit().await.map_err(db_err)?;

        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("User", "id", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(
                user::Column::LastLoginAt,
                sea_orm::sea_query::Expr::value(Some(Utc::now())),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", id));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", id));
        }

        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> DomainResult<Option<UserProfile>> {
        let model = user_profile::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(profile_model_to_domain))
    }

    async fn save_profile(&self, mut profile: UserProfile) -> DomainResult<UserProfile> {
        profile.updated_at = Utc::now();
        let exists = user_profile::Entity::find_by_id(profile.user_id.as_str())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();

        let active = profile_to_active(profile);
        let model = if exists {
            active.update(&self.db).await
        } else {
            active.insert(&self.db).await
        }
        .map_err(db_err)?;

        Ok(profile_model_to_domain(model))
    }

    async fn groups_for_user(&self, user_id: &str) -> DomainResult<Vec<String>> {
        let rows = user_group::Entity::find()
            .filter(user_group::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(|g| g.group_name).collect())
    }
}
