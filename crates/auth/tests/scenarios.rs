//! End-to-end authorization scenarios as a guard adapter would drive them:
//! session state -> user snapshot -> evaluator.

use merchantdesk_auth::{
    AuthState, AuthzError, DenialKind, MerchantOwnership, Permission, ResourceCheck, Role, User,
    authorize_for, explain, has_all_permissions, has_any_permission, has_permission,
    has_permission_for, has_role, normalize_error,
};
use merchantdesk_core::{AppError, ErrorKind, MerchantId, UserId};

fn signed_in(role: Role, merchant: MerchantId) -> AuthState {
    let mut state = AuthState::new();
    state.begin_loading();
    state.set_user(User::new(role).with_id(UserId::new()).with_merchant(merchant));
    state
}

#[test]
fn manager_dashboard_gating() {
    let state = signed_in(Role::Manager, MerchantId::new());
    let user = state.user();

    assert!(has_permission(user, Permission::UsersView));
    assert!(!has_permission(user, Permission::UsersEdit));
    assert!(has_any_permission(user, &[Permission::UsersEdit, Permission::UsersView]));
    assert!(!has_all_permissions(user, &[Permission::UsersEdit, Permission::UsersView]));
    assert!(has_role(user, [Role::Manager, Role::Admin]));
    assert!(!has_role(user, Role::Admin));
}

#[test]
fn cross_merchant_order_edit_is_denied() {
    let my_merchant = MerchantId::new();
    let other_merchant = MerchantId::new();
    let ownership = MerchantOwnership::new()
        .with("order-1", other_merchant)
        .with("order-2", my_merchant);

    let state = signed_in(Role::Manager, my_merchant);
    let user = state.user();

    assert!(has_permission(user, Permission::OrdersEdit));
    assert!(!has_permission_for(user, Permission::OrdersEdit, "order-1", &ownership));
    assert!(has_permission_for(user, Permission::OrdersEdit, "order-2", &ownership));

    let err = authorize_for(user, Permission::OrdersEdit, "order-1", &ownership).unwrap_err();
    assert!(matches!(err, AuthzError::ResourceNotOwned { .. }));

    let explanation = explain(user, Permission::OrdersEdit, Some(ResourceCheck::new("order-1", &ownership)));
    assert!(!explanation.granted);
    assert_eq!(explanation.resource_id.as_deref(), Some("order-1"));
    assert_eq!(explanation.denial_reason.unwrap().kind, DenialKind::ResourceNotOwned);
}

#[test]
fn super_admin_passes_every_check() {
    let state = signed_in(Role::SuperAdmin, MerchantId::new());
    let user = state.user();
    let ownership = MerchantOwnership::new().with("order-1", MerchantId::new());

    for permission in Permission::ALL {
        assert!(has_permission(user, permission));
        assert!(has_permission_for(user, permission, "order-1", &ownership));
    }
    for role in Role::ALL {
        assert!(has_role(user, role));
    }
    assert!(has_role(user, Vec::<Role>::new()));
}

#[test]
fn signing_out_revokes_everything() {
    let mut state = signed_in(Role::Admin, MerchantId::new());
    assert!(has_permission(state.user(), Permission::SettingsEdit));

    state.sign_out();
    assert!(!has_permission(state.user(), Permission::SettingsEdit));
    assert!(!has_role(state.user(), Role::Admin));
}

#[test]
fn failed_sign_in_surfaces_normalized_error() {
    let mut state = AuthState::new();
    state.begin_loading();
    state.set_error(anyhow::anyhow!("invalid login credentials"));

    let err = state.error().cloned().unwrap();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "invalid login credentials");
    assert_eq!(normalize_error(err.clone()), err);
    assert!(!state.is_loading());

    let denied: AppError = AuthzError::Forbidden(Permission::ReportsExport).into();
    assert_eq!(denied.kind, ErrorKind::Authorization);
    assert!(!denied.is_retryable());
}
