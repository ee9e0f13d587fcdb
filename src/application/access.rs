//! Which properties a user may see and act on
//!
//! - Admin: every property
//! - Property manager: properties they manage
//! - Landlord: properties they own
//! - Tenant: properties where they currently rent a unit

use crate::domain::property::PropertyFilter;
use crate::domain::{DomainResult, Property, RepositoryProvider, UserRole};

use super::Actor;

/// Properties visible to `actor`, newest first.
pub async fn accessible_properties(
    repos: &dyn RepositoryProvider,
    actor: &Actor,
) -> DomainResult<Vec<Property>> {
    let filter = match actor.role {
        UserRole::Admin => PropertyFilter::default(),
        UserRole::PropertyManager => PropertyFilter {
            manager_id: Some(actor.user_id.clone()),
            ..Default::default()
        },
        UserRole::Landlord => PropertyFilter {
            owner_id: Some(actor.user_id.clone()),
            ..Default::default()
        },
        UserRole::Tenant => {
            let mut ids: Vec<i32> = repos
                .units()
                .list_for_tenant(&actor.user_id)
                .await?
                .into_iter()
                .map(|u| u.property_id)
                .collect();
            ids.sort_unstable();
            ids.dedup();
            PropertyFilter {
                ids: Some(ids),
                ..Default::default()
            }
        }
    };
    repos.properties().list(filter).await
}

/// Ids of the accessible properties, or `None` when unrestricted.
pub async fn accessible_property_ids(
    repos: &dyn RepositoryProvider,
    actor: &Actor,
) -> DomainResult<Option<Vec<i32>>> {
    if actor.is_admin() {
        return Ok(None);
    }
    let ids = accessible_properties(repos, actor)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    Ok(Some(ids))
}

/// Single-property form of [`accessible_properties`].
pub fn can_access(actor: &Actor, property: &Property, tenant_unit_here: bool) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::PropertyManager => property.manager_id.as_deref() == Some(actor.user_id.as_str()),
        UserRole::Landlord => property.owner_id == actor.user_id,
        UserRole::Tenant => tenant_unit_here,
    }
}

pub async fn has_property_access(
    repos: &dyn RepositoryProvider,
    actor: &Actor,
    property: &Property,
) -> DomainResult<bool> {
    let tenant_unit_here = if actor.is_tenant() {
        repos
            .units()
            .list_for_tenant(&actor.user_id)
            .await?
            .iter()
            .any(|u| u.property_id == property.id)
    } else {
        false
    };
    Ok(can_access(actor, property, tenant_unit_here))
}

/// Whether staff may manage the property's units: active and within the
/// actor's management scope.
pub fn can_manage_units(actor: &Actor, property: &Property) -> bool {
    property.is_active && actor.role.is_staff() && can_access(actor, property, false)
}
