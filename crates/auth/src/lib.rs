//! `merchantdesk-auth`: authorization core of the merchant dashboard.
//!
//! Pure decision functions over an in-memory user snapshot: no HTTP, no
//! storage, no UI. The role → permission table is compiled in.

pub mod authorize;
pub mod evaluate;
pub mod ownership;
pub mod permissions;
pub mod policy;
pub mod registry;
pub mod roles;
pub mod session;
pub mod user;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialReason, PrincipalState, RequiresPermissions,
    authorize, authorize_action, authorize_for, authorize_role, explain,
};
pub use evaluate::{
    Decision, DenialKind, Grant, ResourceCheck, can_manage_role, evaluate, has_all_permissions,
    has_any_permission, has_min_role, has_permission, has_permission_for, has_role,
};
pub use ownership::{DenyAll, MerchantOwnership, OwnershipLookup};
pub use permissions::{ParsePermissionError, Permission};
pub use policy::{effective_permissions, role_grants, role_permissions, roles_granting};
pub use registry::{PermissionDefinition, RbacRegistry, RoleDefinition};
pub use roles::{ParseRoleError, Role, RoleSet};
pub use session::AuthState;
pub use user::User;

pub use merchantdesk_core::{AppError, Caught, ErrorKind, Severity, normalize_error};
