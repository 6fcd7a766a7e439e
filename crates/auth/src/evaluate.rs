//! Permission evaluation and role comparison.
//!
//! - No IO
//! - No panics
//! - Fail closed: an absent user is denied everything
//!
//! Every permission check goes through [`evaluate`], which holds the single
//! universal-role guard. [`has_role`] and friends hold the equivalent guard
//! for role checks.

use serde::Serialize;

use crate::ownership::OwnershipLookup;
use crate::policy::role_grants;
use crate::{Permission, Role, RoleSet, User};

/// A specific resource instance a permission is being checked against.
#[derive(Clone, Copy)]
pub struct ResourceCheck<'a> {
    pub resource_id: &'a str,
    pub ownership: &'a dyn OwnershipLookup,
}

impl<'a> ResourceCheck<'a> {
    pub fn new(resource_id: &'a str, ownership: &'a dyn OwnershipLookup) -> Self {
        Self {
            resource_id,
            ownership,
        }
    }
}

impl core::fmt::Debug for ResourceCheck<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceCheck")
            .field("resource_id", &self.resource_id)
            .finish_non_exhaustive()
    }
}

/// Why a permission was granted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// The user holds the universal role.
    Universal,
    /// The role table grants the permission.
    Role,
    /// The role table grants it and ownership of the resource was confirmed.
    RoleAndOwnership,
}

/// Why a permission was denied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingPermission,
    ResourceNotOwned,
}

/// Outcome of a single permission evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Granted(Grant),
    Denied(DenialKind),
}

impl Decision {
    pub fn is_granted(self) -> bool {
        matches!(self, Decision::Granted(_))
    }
}

/// Evaluate `permission` for `user`, optionally against a specific resource.
///
/// Ownership is only consulted for resource-scoped permissions, and only
/// after the role table has granted the permission.
pub fn evaluate(user: Option<&User>, permission: Permission, resource: Option<ResourceCheck<'_>>) -> Decision {
    let Some(user) = user else {
        return Decision::Denied(DenialKind::Unauthenticated);
    };

    if user.role.is_universal() {
        return Decision::Granted(Grant::Universal);
    }

    if !role_grants(user.role, permission) {
        tracing::trace!(role = %user.role, permission = %permission, "permission not granted by role");
        return Decision::Denied(DenialKind::MissingPermission);
    }

    match resource {
        Some(check) if permission.is_resource_scoped() => {
            if check.ownership.is_owned_by(check.resource_id, user) {
                Decision::Granted(Grant::RoleAndOwnership)
            } else {
                tracing::trace!(
                    role = %user.role,
                    permission = %permission,
                    resource_id = check.resource_id,
                    "resource ownership not confirmed"
                );
                Decision::Denied(DenialKind::ResourceNotOwned)
            }
        }
        _ => Decision::Granted(Grant::Role),
    }
}

/// Whether `user` holds `permission` (no specific resource).
pub fn has_permission(user: Option<&User>, permission: Permission) -> bool {
    evaluate(user, permission, None).is_granted()
}

/// Whether `user` holds `permission` on the resource `resource_id`.
///
/// A resource-scoped permission is never granted here unless `ownership`
/// confirms the resource belongs to the user. Non-scoped permissions ignore
/// the resource. The universal role is granted regardless.
pub fn has_permission_for(
    user: Option<&User>,
    permission: Permission,
    resource_id: &str,
    ownership: &dyn OwnershipLookup,
) -> bool {
    evaluate(user, permission, Some(ResourceCheck::new(resource_id, ownership))).is_granted()
}

/// At least one of `permissions` is granted. Empty input is `false`.
pub fn has_any_permission(user: Option<&User>, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(user, *p))
}

/// Every one of `permissions` is granted.
///
/// Empty input is `true` (vacuous truth), mirroring `has_any_permission(&[]) == false`.
/// Guards that need "at least one requirement" must check emptiness themselves.
pub fn has_all_permissions(user: Option<&User>, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| has_permission(user, *p))
}

/// Whether `user` holds one of `roles`.
///
/// The universal role matches any argument, including an empty set.
pub fn has_role(user: Option<&User>, roles: impl Into<RoleSet>) -> bool {
    let Some(user) = user else {
        return false;
    };
    if user.role.is_universal() {
        return true;
    }
    roles.into().contains(user.role)
}

/// Whether `user` is at least as privileged as `minimum`.
pub fn has_min_role(user: Option<&User>, minimum: Role) -> bool {
    let Some(user) = user else {
        return false;
    };
    user.role.is_universal() || user.role.at_least(minimum)
}

/// Whether `actor` may assign or revoke `target` on another user.
///
/// Non-universal actors need `users.edit` and must strictly outrank the
/// target role, so nobody can hand out their own tier or anything above it.
pub fn can_manage_role(actor: Option<&User>, target: Role) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if actor.role.is_universal() {
        return true;
    }
    role_grants(actor.role, Permission::UsersEdit) && actor.role.outranks(target)
}
