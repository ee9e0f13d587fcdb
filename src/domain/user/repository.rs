use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, UpdateUserDto, User, UserProfile};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user together with an empty profile and membership in the
    /// role's group.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn count_users(&self) -> DomainResult<u64>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_phone(&self, phone: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Ids of users whose first name, last name or username contains
    /// `search`, case-insensitively.
    async fn search_user_ids(&self, search: &str) -> DomainResult<Vec<String>>;

    /// Apply the changed fields. A role change also moves the user into the
    /// new role's group.
    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn record_login(&self, id: &str) -> DomainResult<()>;
    async fn delete_user(&self, id: &str) -> DomainResult<()>;

    async fn get_profile(&self, user_id: &str) -> DomainResult<Option<UserProfile>>;
    async fn save_profile(&self, profile: UserProfile) -> DomainResult<UserProfile>;

    /// Group names the user currently belongs to.
    async fn groups_for_user(&self, user_id: &str) -> DomainResult<Vec<String>>;
}
