use serde::Serialize;
use thiserror::Error;

use merchantdesk_core::{AppError, MerchantId, Severity, UserId};

use crate::evaluate::{Decision, DenialKind, Grant, ResourceCheck, evaluate, has_role};
use crate::ownership::OwnershipLookup;
use crate::policy::{effective_permissions, roles_granting};
use crate::{Permission, Role, RoleSet, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),

    #[error("forbidden: '{permission}' is not allowed on resource '{resource_id}'")]
    ResourceNotOwned {
        permission: Permission,
        resource_id: String,
    },

    #[error("forbidden: requires one of roles {0}")]
    RoleRequired(RoleSet),
}

impl From<AuthzError> for AppError {
    fn from(value: AuthzError) -> Self {
        let message = value.to_string();
        let err = match value {
            AuthzError::Unauthenticated => AppError::authentication(message),
            _ => AppError::authorization(message),
        };
        err.with_severity(Severity::Warning)
    }
}

/// Permission requirements of an action or route.
///
/// Implement this on actions that require permissions; guard adapters call
/// [`authorize_action`] before running them.
pub trait RequiresPermissions {
    fn required_permissions(&self) -> &[Permission];
}

impl RequiresPermissions for [Permission] {
    fn required_permissions(&self) -> &[Permission] {
        self
    }
}

impl<const N: usize> RequiresPermissions for [Permission; N] {
    fn required_permissions(&self) -> &[Permission] {
        self
    }
}

fn decision_to_result(
    user: Option<&User>,
    permission: Permission,
    resource_id: Option<&str>,
    decision: Decision,
) -> Result<(), AuthzError> {
    let err = match decision {
        Decision::Granted(_) => return Ok(()),
        Decision::Denied(DenialKind::Unauthenticated) => AuthzError::Unauthenticated,
        Decision::Denied(DenialKind::MissingPermission) => AuthzError::Forbidden(permission),
        Decision::Denied(DenialKind::ResourceNotOwned) => AuthzError::ResourceNotOwned {
            permission,
            resource_id: resource_id.unwrap_or_default().to_string(),
        },
    };

    tracing::debug!(
        role = user.map(|u| u.role.as_str()),
        permission = %permission,
        resource_id,
        error = %err,
        "authorization denied"
    );
    Err(err)
}

/// `Result` form of [`crate::has_permission`].
pub fn authorize(user: Option<&User>, permission: Permission) -> Result<(), AuthzError> {
    decision_to_result(user, permission, None, evaluate(user, permission, None))
}

/// `Result` form of [`crate::has_permission_for`].
pub fn authorize_for(
    user: Option<&User>,
    permission: Permission,
    resource_id: &str,
    ownership: &dyn OwnershipLookup,
) -> Result<(), AuthzError> {
    let decision = evaluate(user, permission, Some(ResourceCheck::new(resource_id, ownership)));
    decision_to_result(user, permission, Some(resource_id), decision)
}

/// `Result` form of [`has_role`].
pub fn authorize_role(user: Option<&User>, roles: impl Into<RoleSet>) -> Result<(), AuthzError> {
    let roles = roles.into();
    if user.is_none() {
        return Err(AuthzError::Unauthenticated);
    }
    if has_role(user, roles) {
        return Ok(());
    }
    tracing::debug!(
        role = user.map(|u| u.role.as_str()),
        required = %roles,
        "role check denied"
    );
    Err(AuthzError::RoleRequired(roles))
}

/// Check every permission an action requires; the first denial wins.
///
/// An action with no requirements is allowed for any signed-in user.
pub fn authorize_action<A>(user: Option<&User>, action: &A) -> Result<(), AuthzError>
where
    A: RequiresPermissions + ?Sized,
{
    if user.is_none() {
        return Err(AuthzError::Unauthenticated);
    }
    for permission in action.required_permissions() {
        authorize(user, *permission)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// `granted` always agrees with the evaluator for the same inputs.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: Permission,

    /// Resource the check was scoped to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The user's state; absent when nobody is signed in.
    pub principal: Option<PrincipalState>,

    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub role: Role,
    pub user_id: Option<UserId>,
    pub merchant_id: Option<MerchantId>,
    pub effective_permissions: Vec<Permission>,
    pub universal: bool,
}

impl PrincipalState {
    fn of(user: &User) -> Self {
        Self {
            role: user.role,
            user_id: user.id,
            merchant_id: user.merchant_id,
            effective_permissions: effective_permissions(user.role),
            universal: user.role.is_universal(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Explain why a permission check is granted or denied.
pub fn explain(
    user: Option<&User>,
    permission: Permission,
    resource: Option<ResourceCheck<'_>>,
) -> AuthorizationExplanation {
    let decision = evaluate(user, permission, resource);
    let resource_id = resource.map(|r| r.resource_id.to_string());

    let Some(user) = user else {
        return AuthorizationExplanation {
            required_permission: permission,
            resource_id,
            granted: false,
            reason: "No signed-in user; permission checks fail closed".to_string(),
            principal: None,
            denial_reason: Some(DenialReason {
                kind: DenialKind::Unauthenticated,
                message: "No user session is present".to_string(),
                suggestions: vec!["Sign in before performing this action".to_string()],
            }),
        };
    };

    let role = user.role;
    let (reason, denial_reason) = match decision {
        Decision::Granted(Grant::Universal) => (
            format!("Role '{role}' is the universal role and holds every permission"),
            None,
        ),
        Decision::Granted(Grant::Role) => (format!("Role '{role}' grants '{permission}'"), None),
        Decision::Granted(Grant::RoleAndOwnership) => (
            format!(
                "Role '{role}' grants '{permission}' and resource '{}' belongs to the user's merchant",
                resource_id.as_deref().unwrap_or_default()
            ),
            None,
        ),
        Decision::Denied(DenialKind::MissingPermission) => {
            let granting: Vec<&str> = roles_granting(permission)
                .into_iter()
                .map(Role::as_str)
                .collect();
            let mut suggestions = vec![format!(
                "Assign a role that grants '{permission}': {}",
                granting.join(", ")
            )];
            if let Some(least) = granting.first() {
                suggestions.push(format!("The least privileged role granting it is '{least}'"));
            }
            (
                format!("Role '{role}' does not grant '{permission}'"),
                Some(DenialReason {
                    kind: DenialKind::MissingPermission,
                    message: format!("Missing required permission: '{permission}'"),
                    suggestions,
                }),
            )
        }
        Decision::Denied(DenialKind::ResourceNotOwned) => {
            let resource = resource_id.as_deref().unwrap_or_default();
            let suggestion = match user.merchant_id {
                Some(merchant) => format!("Check that resource '{resource}' belongs to merchant {merchant}"),
                None => "The user acts for no merchant; assign one before editing merchant resources".to_string(),
            };
            (
                format!("Role '{role}' grants '{permission}' but resource '{resource}' is not owned by the user's merchant"),
                Some(DenialReason {
                    kind: DenialKind::ResourceNotOwned,
                    message: format!("Resource '{resource}' is outside the user's merchant"),
                    suggestions: vec![suggestion],
                }),
            )
        }
        // Handled by the early return above.
        Decision::Denied(DenialKind::Unauthenticated) => (String::new(), None),
    };

    AuthorizationExplanation {
        required_permission: permission,
        resource_id,
        granted: decision.is_granted(),
        reason,
        principal: Some(PrincipalState::of(user)),
        denial_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::{DenyAll, MerchantOwnership};
    use crate::{has_permission, has_permission_for};
    use merchantdesk_core::ErrorKind;
    use proptest::prelude::*;

    struct RefundOrder;

    impl RequiresPermissions for RefundOrder {
        fn required_permissions(&self) -> &[Permission] {
            &[Permission::OrdersView, Permission::OrdersRefund]
        }
    }

    #[test]
    fn authorize_reports_missing_permission() {
        let staff = User::new(Role::Staff);
        assert_eq!(authorize(Some(&staff), Permission::OrdersView), Ok(()));
        assert_eq!(
            authorize(Some(&staff), Permission::UsersEdit),
            Err(AuthzError::Forbidden(Permission::UsersEdit))
        );
        assert_eq!(authorize(None, Permission::OrdersView), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn authorize_for_reports_foreign_resource() {
        let manager = User::new(Role::Manager).with_merchant(MerchantId::new());
        let ownership = MerchantOwnership::new().with("order-1", MerchantId::new());
        let err = authorize_for(Some(&manager), Permission::OrdersEdit, "order-1", &ownership).unwrap_err();
        assert_eq!(
            err,
            AuthzError::ResourceNotOwned {
                permission: Permission::OrdersEdit,
                resource_id: "order-1".to_string(),
            }
        );
        assert_eq!(err.to_string(), "forbidden: 'orders.edit' is not allowed on resource 'order-1'");
    }

    #[test]
    fn authorize_action_requires_everything() {
        let staff = User::new(Role::Staff);
        let manager = User::new(Role::Manager);
        assert_eq!(
            authorize_action(Some(&staff), &RefundOrder),
            Err(AuthzError::Forbidden(Permission::OrdersRefund))
        );
        assert_eq!(authorize_action(Some(&manager), &RefundOrder), Ok(()));

        let no_requirements: [Permission; 0] = [];
        assert_eq!(authorize_action(Some(&staff), &no_requirements), Ok(()));
        assert_eq!(authorize_action(None, &no_requirements), Err(AuthzError::Unauthenticated));
        assert_eq!(authorize_action(Some(&staff), &[Permission::OrdersView][..]), Ok(()));
    }

    #[test]
    fn authorize_role_distinguishes_signed_out() {
        let staff = User::new(Role::Staff);
        assert_eq!(authorize_role(Some(&staff), [Role::Staff, Role::Manager]), Ok(()));
        assert_eq!(
            authorize_role(Some(&staff), Role::Admin),
            Err(AuthzError::RoleRequired(RoleSet::from(Role::Admin)))
        );
        assert_eq!(authorize_role(None, Role::Admin), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn authz_errors_convert_to_app_errors() {
        let err: AppError = AuthzError::Unauthenticated.into();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.severity, Severity::Warning);

        let err: AppError = AuthzError::Forbidden(Permission::ReportsExport).into();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "forbidden: missing permission 'reports.export'");

        let err: AppError = AuthzError::RoleRequired(RoleSet::from([Role::Admin, Role::Manager])).into();
        assert_eq!(err.message, "forbidden: requires one of roles [manager, admin]");
    }

    #[test]
    fn explain_missing_permission_suggests_roles() {
        let staff = User::new(Role::Staff);
        let explanation = explain(Some(&staff), Permission::ReportsView, None);
        assert!(!explanation.granted);
        let denial = explanation.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPermission);
        assert_eq!(
            denial.suggestions,
            vec![
                "Assign a role that grants 'reports.view': manager, admin, super_admin".to_string(),
                "The least privileged role granting it is 'manager'".to_string(),
            ]
        );
        let principal = explanation.principal.unwrap();
        assert_eq!(principal.role, Role::Staff);
        assert!(!principal.universal);
    }

    #[test]
    fn explain_universal_grant() {
        let root = User::new(Role::SuperAdmin);
        let explanation = explain(Some(&root), Permission::MerchantsEdit, Some(ResourceCheck::new("m-1", &DenyAll)));
        assert!(explanation.granted);
        assert!(explanation.reason.contains("universal"));
        assert_eq!(explanation.principal.unwrap().effective_permissions.len(), Permission::ALL.len());
    }

    #[test]
    fn explain_signed_out() {
        let explanation = explain(None, Permission::OrdersView, None);
        assert!(!explanation.granted);
        assert!(explanation.principal.is_none());
        assert_eq!(explanation.denial_reason.unwrap().kind, DenialKind::Unauthenticated);
    }

    #[test]
    fn explanation_serializes_with_wire_names() {
        let staff = User::new(Role::Staff);
        let json = serde_json::to_value(explain(Some(&staff), Permission::UsersEdit, None)).unwrap();
        assert_eq!(json["required_permission"], "users.edit");
        assert_eq!(json["granted"], false);
        assert_eq!(json["denial_reason"]["kind"], "missing_permission");
        assert_eq!(json["principal"]["role"], "staff");
        assert!(json.get("resource_id").is_none());
    }

    proptest! {
        #[test]
        fn explanation_agrees_with_evaluator(
            role in prop::option::of(prop::sample::select(Role::ALL.to_vec())),
            permission in prop::sample::select(Permission::ALL.to_vec()),
            owned in prop::option::of(any::<bool>()),
        ) {
            let user = role.map(User::new);
            let lookup = move |_: &str, _: &User| owned.unwrap_or(false);
            match owned {
                None => {
                    let explanation = explain(user.as_ref(), permission, None);
                    prop_assert_eq!(explanation.granted, has_permission(user.as_ref(), permission));
                }
                Some(_) => {
                    let explanation = explain(user.as_ref(), permission, Some(ResourceCheck::new("r-1", &lookup)));
                    prop_assert_eq!(
                        explanation.granted,
                        has_permission_for(user.as_ref(), permission, "r-1", &lookup)
                    );
                }
            }
        }
    }
}
