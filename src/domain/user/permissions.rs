//! Role groups and their permission sets
//!
//! Each role owns one group, named after the role's stored value. A user is a
//! member of exactly the group that matches their current role.

use super::UserRole;

/// Permission group tied to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGroup {
    pub role: UserRole,
    pub description: &'static str,
    pub permissions: &'static [&'static str],
}

impl RoleGroup {
    pub fn name(&self) -> &'static str {
        self.role.as_str()
    }

    pub fn has_permission(&self, codename: &str) -> bool {
        self.permissions.contains(&codename)
    }
}

const ADMIN_PERMISSIONS: &[&str] = &[
    "users.add_user",
    "users.change_user",
    "users.delete_user",
    "users.view_user",
    "users.add_userprofile",
    "users.change_userprofile",
    "users.delete_userprofile",
    "users.view_userprofile",
    "properties.add_property",
    "properties.change_property",
    "properties.delete_property",
    "properties.view_property",
    "properties.add_rentalunit",
    "properties.change_rentalunit",
    "properties.delete_rentalunit",
    "properties.view_rentalunit",
    "payments.add_payment",
    "payments.change_payment",
    "payments.delete_payment",
    "payments.view_payment",
    "maintenance.add_maintenancerequest",
    "maintenance.change_maintenancerequest",
    "maintenance.delete_maintenancerequest",
    "maintenance.view_maintenancerequest",
    "reports.view_reports",
    "reports.generate_reports",
];

const PROPERTY_MANAGER_PERMISSIONS: &[&str] = &[
    "users.view_user",
    // tenants and landlords only
    "users.change_user",
    "properties.add_property",
    "properties.change_property",
    "properties.view_property",
    "properties.add_rentalunit",
    "properties.change_rentalunit",
    "properties.view_rentalunit",
    "payments.add_payment",
    "payments.change_payment",
    "payments.view_payment",
    "maintenance.add_maintenancerequest",
    "maintenance.change_maintenancerequest",
    "maintenance.view_maintenancerequest",
    "reports.view_reports",
];

const LANDLORD_PERMISSIONS: &[&str] = &[
    "users.view_user",
    "properties.add_property",
    "properties.change_property",
    "properties.view_property",
    "properties.add_rentalunit",
    "properties.change_rentalunit",
    "properties.view_rentalunit",
    "payments.view_payment",
    "maintenance.change_maintenancerequest",
    "maintenance.view_maintenancerequest",
    "reports.view_reports",
];

const TENANT_PERMISSIONS: &[&str] = &[
    "users.view_user",
    "users.change_userprofile",
    "properties.view_property",
    "properties.view_rentalunit",
    "payments.add_payment",
    "payments.view_payment",
    "maintenance.add_maintenancerequest",
    "maintenance.view_maintenancerequest",
];

/// The permission group for `role`.
pub fn group_for(role: UserRole) -> RoleGroup {
    match role {
        UserRole::Admin => RoleGroup {
            role,
            description: "Full system access",
            permissions: ADMIN_PERMISSIONS,
        },
        UserRole::PropertyManager => RoleGroup {
            role,
            description: "Manage assigned properties and tenants",
            permissions: PROPERTY_MANAGER_PERMISSIONS,
        },
        UserRole::Landlord => RoleGroup {
            role,
            description: "Manage owned properties",
            permissions: LANDLORD_PERMISSIONS,
        },
        UserRole::Tenant => RoleGroup {
            role,
            description: "View rental information and make payments",
            permissions: TENANT_PERMISSIONS,
        },
    }
}

pub fn all_groups() -> Vec<RoleGroup> {
    UserRole::ALL.into_iter().map(group_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names_match_roles() {
        for g in all_groups() {
            assert_eq!(g.name(), g.role.as_str());
        }
    }

    #[test]
    fn admin_has_every_permission_of_other_groups() {
        let admin = group_for(UserRole::Admin);
        for g in all_groups() {
            for p in g.permissions {
                assert!(admin.has_permission(p), "admin missing {p}");
            }
        }
    }

    #[test]
    fn landlord_cannot_change_payments() {
        let g = group_for(UserRole::Landlord);
        assert!(g.has_permission("payments.view_payment"));
        assert!(!g.has_permission("payments.change_payment"));
    }

    #[test]
    fn tenant_can_pay_but_not_manage_stock() {
        let g = group_for(UserRole::Tenant);
        assert!(g.has_permission("payments.add_payment"));
        assert!(!g.has_permission("properties.add_property"));
        assert!(!g.has_permission("properties.add_rentalunit"));
    }
}
