//! User management service

use std::sync::Arc;

use tracing::{info, warn};
use validator::ValidateEmail;

use crate::application::{access, Actor};
use crate::domain::payment::PaymentFilter;
use crate::domain::user::{
    group_for, CreateUserDto, GetUserDto, RoleGroup, UpdateProfileDto, UpdateUserDto,
};
use crate::domain::{
    DomainError, DomainResult, Property, RentalUnit, RepositoryProvider, UnitReservation, User,
    UserProfile, UserRole,
};
use crate::infrastructure::crypto::{create_token, hash_password, verify_password, JwtConfig};
use crate::shared::{normalize_kenyan_phone, PaginatedResult};


const MIN_PASSWORD_LEN: usize = 8;

/// Account fields shared by every creation path
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

/// Public sign-up request
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: NewUser,
    pub role: UserRole,
    pub terms_accepted: bool,
}

/// Returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// The caller with their group's permission set
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub group: RoleGroup,
}

/// Role-specific landing data
#[derive(Debug, Clone)]
pub enum Dashboard {
    Admin {
        properties: u64,
        units: u64,
        users: u64,
        pending_payments: u64,
    },
    /// Property manager or landlord
    Staff {
        role: UserRole,
        properties: Vec<Property>,
    },
    Tenant {
        units: Vec<RentalUnit>,
        reservations: Vec<UnitReservation>,
    },
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email and issue a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();
        let user = match users.get_user_by_username(username_or_email).await? {
            Some(u) => Some(u),
            None => users.get_user_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(username = %user.username, "Failed login attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }
        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let token = create_token(&user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        users.record_login(&user.id).await?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Self-service sign-up. Admin accounts cannot be self-registered.
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        if !registration.role.is_self_registrable() {
            return Err(DomainError::Validation(
                "Role must be one of Tenant, Landlord or Property Manager".into(),
            ));
        }
        if !registration.terms_accepted {
            return Err(DomainError::Validation(
                "You must accept the terms and conditions".into(),
            ));
        }

        let user = self.create_account(registration.user, registration.role).await?;
        info!(user_id = %user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    /// Staff onboarding of a tenant; the role is always Tenant.
    pub async fn add_tenant(&self, actor: &Actor, new_user: NewUser) -> DomainResult<User> {
        actor.require_staff("You don't have permission to add tenants.")?;
        let user = self.create_account(new_user, UserRole::Tenant).await?;
        info!(user_id = %user.id, added_by = %actor.user_id, "Tenant added");
        Ok(user)
    }

    /// Admin-only creation of an account with any role.
    pub async fn create_user(
        &self,
        actor: &Actor,
        new_user: NewUser,
        role: UserRole,
    ) -> DomainResult<User> {
        actor.require(&[UserRole::Admin], "Only administrators can create users.")?;
        let user = self.create_account(new_user, role).await?;
        info!(user_id = %user.id, role = %user.role, created_by = %actor.user_id, "User created");
        Ok(user)
    }

    /// Bootstrap an administrator when the user table is empty.
    pub async fn create_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(None);
        }
        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                email: email.to_string(),
                first_name: "System".into(),
                last_name: "Administrator".into(),
                phone_number: None,
                role: UserRole::Admin,
                password_hash,
            })
            .await?;
        warn!(username, "Default admin created; change its password");
        Ok(Some(user))
    }

    async fn create_account(&self, new_user: NewUser, role: UserRole) -> DomainResult<User> {
        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_lowercase();

        validate_username(&username)?;
        if !email.validate_email() {
            return Err(DomainError::Validation("Enter a valid email address".into()));
        }
        if new_user.password != new_user.password_confirm {
            return Err(DomainError::Validation("Passwords don't match".into()));
        }
        validate_password(&new_user.password)?;

        let phone_number = match new_user.phone_number.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => {
                Some(normalize_kenyan_phone(p).map_err(DomainError::Validation)?)
            }
            _ => None,
        };

        let users = self.repos.users();
        if users.get_user_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict(
                "A user with this username already exists.".into(),
            ));
        }
        if users.get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(
                "A user with this email already exists.".into(),
            ));
        }
        if let Some(phone) = &phone_number {
            if users.get_user_by_phone(phone).await?.is_some() {
                return Err(DomainError::Conflict(
                    "A user with this phone number already exists.".into(),
                ));
            }
        }

        let password_hash = hash_password(&new_user.password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        users
            .create_user(CreateUserDto {
                username,
                email,
                first_name: new_user.first_name.trim().to_string(),
                last_name: new_user.last_name.trim().to_string(),
                phone_number,
                role,
                password_hash,
            })
            .await
    }

    // ── Current user ────────────────────────────────────────────

    /// The stored account behind a verified token. `None` once the user is
    /// deleted or deactivated.
    pub async fn active_account(&self, user_id: &str) -> DomainResult<Option<User>> {
        Ok(self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .filter(|u| u.is_active))
    }

    pub async fn me(&self, actor: &Actor) -> DomainResult<CurrentUser> {
        let user = self.require_user(&actor.user_id).await?;
        let group = group_for(user.role);
        Ok(CurrentUser { user, group })
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_password(new_password)?;

        let user = self.require_user(&actor.user_id).await?;
        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        self.repos
            .users()
            .update_user_password(&user.id, &new_hash)
            .await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Fetch the caller's profile, creating an empty one if missing.
    pub async fn get_profile(&self, actor: &Actor) -> DomainResult<(User, UserProfile)> {
        let user = self.require_user(&actor.user_id).await?;
        let profile = match self.repos.users().get_profile(&user.id).await? {
            Some(p) => p,
            None => {
                self.repos
                    .users()
                    .save_profile(UserProfile::empty(&user.id))
                    .await?
            }
        };
        Ok((user, profile))
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        dto: UpdateProfileDto,
    ) -> DomainResult<(User, UserProfile)> {
        let (_, mut profile) = self.get_profile(actor).await?;

        let phone_number = match dto.phone_number.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(p) => Some(Some(normalize_kenyan_phone(p).map_err(DomainError::Validation)?)),
        };
        let email = match dto.email {
            Some(e) => {
                let e = e.trim().to_lowercase();
                if !e.validate_email() {
                    return Err(DomainError::Validation("Enter a valid email address".into()));
                }
                Some(e)
            }
            None => None,
        };

        let user = self
            .repos
            .users()
            .update_user(
                &actor.user_id,
                UpdateUserDto {
                    first_name: dto.first_name,
                    last_name: dto.last_name,
                    email,
                    phone_number,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", &actor.user_id))?;

        if let Some(phone) = dto.emergency_contact_phone {
            profile.emergency_contact_phone = match phone.trim() {
                "" => None,
                p => Some(normalize_kenyan_phone(p).map_err(DomainError::Validation)?),
            };
        }
        if dto.date_of_birth.is_some() {
            profile.date_of_birth = dto.date_of_birth;
        }
        set_text(&mut profile.national_id, dto.national_id);
        set_text(&mut profile.county, dto.county);
        set_text(&mut profile.town, dto.town);
        set_text(&mut profile.address, dto.address);
        set_text(&mut profile.emergency_contact_name, dto.emergency_contact_name);
        if let Some(lang) = dto.preferred_language {
            profile.preferred_language = lang;
        }
        if let Some(v) = dto.email_notifications {
            profile.email_notifications = v;
        }
        if let Some(v) = dto.sms_notifications {
            profile.sms_notifications = v;
        }

        let profile = self.repos.users().save_profile(profile).await?;
        Ok((user, profile))
    }

    // ── Directory ───────────────────────────────────────────────

    /// Admin sees everyone, a property manager sees tenants and landlords,
    /// everyone else sees only themselves.
    pub async fn list_users(
        &self,
        actor: &Actor,
        mut dto: GetUserDto,
    ) -> DomainResult<PaginatedResult<User>> {
        match actor.role {
            UserRole::Admin => {}
            UserRole::PropertyManager => {
                dto.roles_in = Some(vec![UserRole::Tenant, UserRole::Landlord]);
            }
            _ => dto.only_id = Some(actor.user_id.clone()),
        }
        self.repos.users().list_users(dto).await
    }

    pub async fn get_user(&self, actor: &Actor, id: &str) -> DomainResult<User> {
        let user = self.require_user(id).await?;
        if !can_see(actor, &user) {
            return Err(DomainError::not_found("User", "id", id));
        }
        Ok(user)
    }

    /// Role and activation changes are reserved for administrators.
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: &str,
        mut dto: UpdateUserDto,
    ) -> DomainResult<User> {
        let target = self.get_user(actor, id).await?;
        if (dto.role.is_some() || dto.is_active.is_some()) && !actor.is_admin() {
            return Err(DomainError::Forbidden(
                "Only administrators can change roles or account status.".into(),
            ));
        }
        if let Some(username) = &dto.username {
            validate_username(username.trim())?;
            dto.username = Some(username.trim().to_string());
        }
        if let Some(email) = &dto.email {
            let email = email.trim().to_lowercase();
            if !email.validate_email() {
                return Err(DomainError::Validation("Enter a valid email address".into()));
            }
            dto.email = Some(email);
        }
        if let Some(Some(phone)) = &dto.phone_number {
            let phone = phone.trim();
            dto.phone_number = if phone.is_empty() {
                Some(None)
            } else {
                Some(Some(normalize_kenyan_phone(phone).map_err(DomainError::Validation)?))
            };
        }

        let updated = self
            .repos
            .users()
            .update_user(&target.id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        info!(user_id = %updated.id, updated_by = %actor.user_id, "User updated");
        Ok(updated)
    }

    pub async fn delete_user(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require(&[UserRole::Admin], "Only administrators can delete users.")?;
        if actor.user_id == id {
            return Err(DomainError::Validation(
                "You cannot delete your own account".into(),
            ));
        }
        self.require_user(id).await?;
        self.repos.users().delete_user(id).await?;
        info!(user_id = id, deleted_by = %actor.user_id, "User deleted");
        Ok(())
    }

    /// Change a user's role; group membership is replaced with the new
    /// role's group.
    pub async fn change_role(
        &self,
        actor: &Actor,
        id: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        actor.require(&[UserRole::Admin], "Only administrators can change roles.")?;
        let user = self
            .repos
            .users()
            .update_user(
                id,
                UpdateUserDto {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        info!(user_id = id, role = %role, "User assigned to group");
        Ok(user)
    }

    pub async fn groups_for_user(&self, id: &str) -> DomainResult<Vec<String>> {
        self.repos.users().groups_for_user(id).await
    }

    // ── Dashboard ───────────────────────────────────────────────

    pub async fn dashboard(&self, actor: &Actor) -> DomainResult<Dashboard> {
        match actor.role {
            UserRole::Admin => {
                let summary = self
                    .repos
                    .payments()
                    .summary(PaymentFilter::default())
                    .await?;
                Ok(Dashboard::Admin {
                    properties: self.repos.properties().count().await?,
                    units: self.repos.units().count().await?,
                    users: self.repos.users().count_users().await?,
                    pending_payments: summary.pending_payments,
                })
            }
            UserRole::PropertyManager | UserRole::Landlord => Ok(Dashboard::Staff {
                role: actor.role,
                properties: access::accessible_properties(self.repos.as_ref(), actor).await?,
            }),
            UserRole::Tenant => Ok(Dashboard::Tenant {
                units: self.repos.units().list_for_tenant(&actor.user_id).await?,
                reservations: self
                    .repos
                    .reservations()
                    .find_for_tenant(&actor.user_id)
                    .await?,
            }),
        }
    }

    async fn require_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }
}

// ── Helpers ─────────────────────────────────────────────────────

fn can_see(actor: &Actor, user: &User) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::PropertyManager => {
            user.id == actor.user_id
                || matches!(user.role, UserRole::Tenant | UserRole::Landlord)
        }
        _ => user.id == actor.user_id,
    }
}

fn validate_username(username: &str) -> DomainResult<()> {
    let len = username.chars().count();
    if !(3..=150).contains(&len) {
        return Err(DomainError::Validation(
            "Username must be 3-150 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(DomainError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// `Some("")` clears the field.
fn set_text(field: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        let v = v.trim().to_string();
        *field = if v.is_empty() { None } else { Some(v) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStorage;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryStorage::new()),
            JwtConfig::new("test-secret", 1),
        )
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: format!("{}@example.com", username),
            first_name: "Amina".into(),
            last_name: "Otieno".into(),
            phone_number: None,
            password: "s3cure-pass".into(),
            password_confirm: "s3cure-pass".into(),
        }
    }

    fn registration(username: &str, role: UserRole) -> Registration {
        Registration {
            user: new_user(username),
            role,
            terms_accepted: true,
        }
    }

    fn actor(user: &User) -> Actor {
        Actor::new(&user.id, &user.username, user.role)
    }

    async fn admin(svc: &UserService) -> User {
        svc.create_default_admin("admin", "admin@example.com", "admin-pass")
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn register_places_user_in_role_group() {
        let svc = service();
        let mut reg = registration("wanjiru", UserRole::Landlord);
        reg.user.phone_number = Some("0712345678".into());
        let user = svc.register(reg).await.unwrap();

        assert_eq!(user.role, UserRole::Landlord);
        assert_eq!(user.phone_number.as_deref(), Some("+254712345678"));
        assert_eq!(svc.groups_for_user(&user.id).await.unwrap(), vec!["LANDLORD"]);

        let (_, profile) = svc.get_profile(&actor(&user)).await.unwrap();
        assert!(profile.email_notifications);
    }

    #[tokio::test]
    async fn register_rejects_admin_and_bad_input() {
        let svc = service();
        assert!(matches!(
            svc.register(registration("boss", UserRole::Admin)).await,
            Err(DomainError::Validation(_))
        ));

        let mut reg = registration("kamau", UserRole::Tenant);
        reg.user.password_confirm = "different".into();
        assert!(svc.register(reg).await.is_err());

        let mut reg = registration("kamau", UserRole::Tenant);
        reg.user.password = "short".into();
        reg.user.password_confirm = "short".into();
        assert!(svc.register(reg).await.is_err());

        let mut reg = registration("kamau", UserRole::Tenant);
        reg.terms_accepted = false;
        assert!(svc.register(reg).await.is_err());

        let mut reg = registration("kamau", UserRole::Tenant);
        reg.user.phone_number = Some("0812345678".into());
        assert!(svc.register(reg).await.is_err());

        let mut reg = registration("kamau", UserRole::Tenant);
        reg.user.email = "not-an-email".into();
        assert!(svc.register(reg).await.is_err());
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let svc = service();
        let mut reg = registration("otieno", UserRole::Tenant);
        reg.user.phone_number = Some("+254712000000".into());
        svc.register(reg).await.unwrap();

        assert!(matches!(
            svc.register(registration("otieno", UserRole::Tenant)).await,
            Err(DomainError::Conflict(_))
        ));

        let mut reg = registration("other", UserRole::Tenant);
        reg.user.phone_number = Some("0712000000".into());
        assert!(matches!(svc.register(reg).await, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn login_by_username_or_email() {
        let svc = service();
        let user = svc.register(registration("njeri", UserRole::Tenant)).await.unwrap();

        let auth = svc.login("njeri", "s3cure-pass").await.unwrap();
        assert_eq!(auth.user.id, user.id);
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 3600);

        assert!(svc.login("njeri@example.com", "s3cure-pass").await.is_ok());
        assert!(matches!(
            svc.login("njeri", "wrong-password").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(svc.login("ghost", "s3cure-pass").await.is_err());
    }

    #[tokio::test]
    async fn inactive_user_cannot_login() {
        let svc = service();
        let root = admin(&svc).await;
        let user = svc.register(registration("mutua", UserRole::Tenant)).await.unwrap();
        svc.update_user(
            &actor(&root),
            &user.id,
            UpdateUserDto {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            svc.login("mutua", "s3cure-pass").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn default_admin_only_on_empty_store() {
        let svc = service();
        let root = admin(&svc).await;
        assert_eq!(root.role, UserRole::Admin);
        assert!(svc
            .create_default_admin("admin2", "a2@example.com", "password")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn add_tenant_forces_tenant_role() {
        let svc = service();
        let landlord = svc.register(registration("owner", UserRole::Landlord)).await.unwrap();
        let tenant = svc.add_tenant(&actor(&landlord), new_user("renter")).await.unwrap();
        assert_eq!(tenant.role, UserRole::Tenant);

        assert!(matches!(
            svc.add_tenant(&actor(&tenant), new_user("another")).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn create_user_is_admin_only() {
        let svc = service();
        let root = admin(&svc).await;
        let pm = svc
            .create_user(&actor(&root), new_user("manager"), UserRole::PropertyManager)
            .await
            .unwrap();
        assert_eq!(pm.role, UserRole::PropertyManager);
        assert!(svc
            .create_user(&actor(&pm), new_user("x-user"), UserRole::Admin)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn list_users_is_scoped_by_role() {
        let svc = service();
        let root = admin(&svc).await;
        let pm = svc
            .create_user(&actor(&root), new_user("manager"), UserRole::PropertyManager)
            .await
            .unwrap();
        svc.register(registration("landlord1", UserRole::Landlord)).await.unwrap();
        let tenant = svc.register(registration("tenant1", UserRole::Tenant)).await.unwrap();

        let all = svc.list_users(&actor(&root), GetUserDto::default()).await.unwrap();
        assert_eq!(all.total, 4);

        let seen_by_pm = svc.list_users(&actor(&pm), GetUserDto::default()).await.unwrap();
        assert_eq!(seen_by_pm.total, 2);
        assert!(seen_by_pm
            .items
            .iter()
            .all(|u| matches!(u.role, UserRole::Tenant | UserRole::Landlord)));

        let seen_by_tenant = svc
            .list_users(&actor(&tenant), GetUserDto::default())
            .await
            .unwrap();
        assert_eq!(seen_by_tenant.total, 1);
        assert_eq!(seen_by_tenant.items[0].id, tenant.id);

        assert!(matches!(
            svc.get_user(&actor(&tenant), &pm.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn only_admin_changes_role_or_status() {
        let svc = service();
        let root = admin(&svc).await;
        let pm = svc
            .create_user(&actor(&root), new_user("manager"), UserRole::PropertyManager)
            .await
            .unwrap();
        let tenant = svc.register(registration("tenant1", UserRole::Tenant)).await.unwrap();

        let escalate = UpdateUserDto {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_user(&actor(&pm), &tenant.id, escalate.clone()).await,
            Err(DomainError::Forbidden(_))
        ));

        let renamed = svc
            .update_user(
                &actor(&pm),
                &tenant.id,
                UpdateUserDto {
                    first_name: Some("Achieng".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.first_name, "Achieng");

        let promoted = svc.update_user(&actor(&root), &tenant.id, escalate).await.unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn change_role_moves_group() {
        let svc = service();
        let root = admin(&svc).await;
        let user = svc.register(registration("switcher", UserRole::Tenant)).await.unwrap();

        svc.change_role(&actor(&root), &user.id, UserRole::Landlord)
            .await
            .unwrap();
        assert_eq!(svc.groups_for_user(&user.id).await.unwrap(), vec!["LANDLORD"]);

        assert!(svc
            .change_role(&actor(&user), &user.id, UserRole::Admin)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn delete_user_rules() {
        let svc = service();
        let root = admin(&svc).await;
        let user = svc.register(registration("leaver", UserRole::Tenant)).await.unwrap();

        assert!(svc.delete_user(&actor(&user), &root.id).await.is_err());
        assert!(svc.delete_user(&actor(&root), &root.id).await.is_err());
        svc.delete_user(&actor(&root), &user.id).await.unwrap();
        assert!(svc.get_user(&actor(&root), &user.id).await.is_err());
    }

    #[tokio::test]
    async fn change_password_verifies_current() {
        let svc = service();
        let user = svc.register(registration("changer", UserRole::Tenant)).await.unwrap();
        let me = actor(&user);

        assert!(matches!(
            svc.change_password(&me, "wrong-one", "new-password").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(svc.change_password(&me, "s3cure-pass", "short").await.is_err());
        svc.change_password(&me, "s3cure-pass", "new-password")
            .await
            .unwrap();
        assert!(svc.login("changer", "new-password").await.is_ok());
    }

    #[tokio::test]
    async fn update_profile_touches_user_and_profile() {
        let svc = service();
        let user = svc.register(registration("profiled", UserRole::Tenant)).await.unwrap();
        let me = actor(&user);

        let (user, profile) = svc
            .update_profile(
                &me,
                UpdateProfileDto {
                    last_name: Some("Kariuki".into()),
                    phone_number: Some("0112345678".into()),
                    emergency_contact_phone: Some("0799999999".into()),
                    town: Some("Thika".into()),
                    sms_notifications: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(user.last_name, "Kariuki");
        assert_eq!(user.phone_number.as_deref(), Some("+254112345678"));
        assert_eq!(profile.emergency_contact_phone.as_deref(), Some("+254799999999"));
        assert_eq!(profile.town.as_deref(), Some("Thika"));
        assert!(!profile.sms_notifications);

        assert!(svc
            .update_profile(
                &me,
                UpdateProfileDto {
                    emergency_contact_phone: Some("12345".into()),
                    ..Default::default()
                },
            )
            .await
            .is_err());
    }

    #[tokio::test]
    async fn me_reports_group_permissions() {
        let svc = service();
        let user = svc.register(registration("viewer", UserRole::Tenant)).await.unwrap();
        let current = svc.me(&actor(&user)).await.unwrap();
        assert_eq!(current.group.name(), "TENANT");
        assert!(current.group.has_permission("payments.add_payment"));
    }

    #[tokio::test]
    async fn admin_dashboard_counts() {
        let svc = service();
        let root = admin(&svc).await;
        svc.register(registration("someone", UserRole::Tenant)).await.unwrap();
        match svc.dashboard(&actor(&root)).await.unwrap() {
            Dashboard::Admin { users, properties, .. } => {
                assert_eq!(users, 2);
                assert_eq!(properties, 0);
            }
            other => panic!("unexpected dashboard {:?}", other),
        }
    }
}
