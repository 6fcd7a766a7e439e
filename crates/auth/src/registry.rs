//! Read-only view of the RBAC taxonomy for audit and admin screens.

use serde::Serialize;

use crate::policy::{effective_permissions, roles_granting};
use crate::{Permission, Role};

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub rank: u8,
    pub universal: bool,
    pub description: &'static str,
    pub permissions: Vec<Permission>,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    pub permission: Permission,
    pub category: &'static str,
    pub description: String,
    pub resource_scoped: bool,
    pub granted_to: Vec<Role>,
}

/// Registry of all roles and permissions.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    /// Most privileged first.
    pub roles: Vec<RoleDefinition>,
    pub permissions: Vec<PermissionDefinition>,
}

impl RbacRegistry {
    pub fn build() -> Self {
        let roles = Role::ALL
            .into_iter()
            .rev()
            .map(|role| RoleDefinition {
                role,
                rank: role.rank(),
                universal: role.is_universal(),
                description: role_description(role),
                permissions: effective_permissions(role),
            })
            .collect();

        let permissions = Permission::ALL
            .into_iter()
            .map(|permission| PermissionDefinition {
                permission,
                category: permission.category(),
                description: permission_description(permission),
                resource_scoped: permission.is_resource_scoped(),
                granted_to: roles_granting(permission),
            })
            .collect();

        Self { roles, permissions }
    }

    pub fn role(&self, role: Role) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn permission(&self, permission: Permission) -> Option<&PermissionDefinition> {
        self.permissions.iter().find(|p| p.permission == permission)
    }
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "Platform operator with every permission, across all merchants",
        Role::Admin => "Merchant administrator: users, catalogue, orders, payments and settings",
        Role::Manager => "Store manager with operational access and reporting",
        Role::Staff => "Store staff handling orders and looking up products and customers",
        Role::Customer => "Customer account limited to browsing products and own orders",
    }
}

fn permission_description(permission: Permission) -> String {
    let action = match permission.action() {
        "view" => "View",
        "create" => "Create",
        "edit" => "Edit",
        "delete" => "Delete",
        "refund" => "Refund",
        "export" => "Export",
        other => other,
    };
    let mut description = format!("{action} {}", permission.category());
    if permission.is_resource_scoped() {
        description.push_str(" (owning merchant only)");
    }
    description
}
