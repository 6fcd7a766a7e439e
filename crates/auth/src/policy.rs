//! The compiled role → permission table.
//!
//! This table is the single source of truth for what each role may do. It is
//! an exhaustive `match`: a new role cannot be added without an entry. The
//! universal role's entry is empty because its effective set is computed
//! (every permission), so new permissions never need to be added to it.

use crate::{Permission, Role};

use Permission::*;

const ADMIN: &[Permission] = &[
    UsersView,
    UsersCreate,
    UsersEdit,
    UsersDelete,
    OrdersView,
    OrdersCreate,
    OrdersEdit,
    OrdersDelete,
    OrdersRefund,
    ProductsView,
    ProductsCreate,
    ProductsEdit,
    ProductsDelete,
    CustomersView,
    CustomersEdit,
    ReportsView,
    ReportsExport,
    PaymentsView,
    PaymentsRefund,
    MerchantsView,
    // merchants.edit is reserved for super admins.
    SettingsView,
    SettingsEdit,
];

const MANAGER: &[Permission] = &[
    UsersView,
    OrdersView,
    OrdersCreate,
    OrdersEdit,
    OrdersRefund,
    ProductsView,
    ProductsCreate,
    ProductsEdit,
    CustomersView,
    CustomersEdit,
    ReportsView,
    ReportsExport,
    PaymentsView,
    SettingsView,
];

const STAFF: &[Permission] = &[
    OrdersView,
    OrdersCreate,
    OrdersEdit,
    ProductsView,
    CustomersView,
];

const CUSTOMER: &[Permission] = &[OrdersView, OrdersCreate, ProductsView];

/// Raw table entry for `role`.
///
/// Empty for the universal role; use [`effective_permissions`] or
/// [`role_grants`] for decisions.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::SuperAdmin => &[],
        Role::Admin => ADMIN,
        Role::Manager => MANAGER,
        Role::Staff => STAFF,
        Role::Customer => CUSTOMER,
    }
}

/// Everything `role` is granted, in declaration order.
pub fn effective_permissions(role: Role) -> Vec<Permission> {
    if role.is_universal() {
        return Permission::ALL.to_vec();
    }
    let granted = role_permissions(role);
    Permission::ALL
        .into_iter()
        .filter(|p| granted.contains(p))
        .collect()
}

/// Whether `role` is granted `permission` by the table.
pub fn role_grants(role: Role, permission: Permission) -> bool {
    role.is_universal() || role_permissions(role).contains(&permission)
}

/// Roles that grant `permission`, least privileged first.
pub fn roles_granting(permission: Permission) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|r| role_grants(*r, permission))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn universal_role_is_computed_not_enumerated() {
        assert!(role_permissions(Role::UNIVERSAL).is_empty());
        assert_eq!(effective_permissions(Role::UNIVERSAL), Permission::ALL.to_vec());
    }

    #[test]
    fn entries_have_no_duplicates() {
        for role in Role::ALL {
            let entry = role_permissions(role);
            let unique: HashSet<_> = entry.iter().collect();
            assert_eq!(unique.len(), entry.len(), "duplicate permission for {role}");
        }
    }

    #[test]
    fn higher_roles_grant_a_superset() {
        for pair in Role::ALL.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            for p in effective_permissions(lower) {
                assert!(role_grants(higher, p), "{higher} lacks {p} granted to {lower}");
            }
        }
    }

    #[test]
    fn manager_sees_users_but_cannot_edit_them() {
        assert!(role_grants(Role::Manager, Permission::UsersView));
        assert!(!role_grants(Role::Manager, Permission::UsersEdit));
    }

    #[test]
    fn admin_cannot_edit_merchants() {
        assert!(!role_grants(Role::Admin, Permission::MerchantsEdit));
        assert_eq!(roles_granting(Permission::MerchantsEdit), vec![Role::SuperAdmin]);
    }

    #[test]
    fn roles_granting_lists_least_privileged_first() {
        assert_eq!(
            roles_granting(Permission::OrdersEdit),
            vec![Role::Staff, Role::Manager, Role::Admin, Role::SuperAdmin]
        );
    }
}
