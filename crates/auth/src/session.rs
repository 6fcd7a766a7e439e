//! Auth state holder.
//!
//! An explicit, owned container for the current session. The session
//! collaborator (sign-in, token refresh, profile fetch) mutates it; guards
//! read a user snapshot from it and hand that to the evaluator.

use merchantdesk_core::{AppError, Caught, normalize_error};

use crate::User;

/// `{current_user, is_loading, error}` for one session.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    current_user: Option<User>,
    is_loading: bool,
    error: Option<AppError>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user, if any. Pass this to the evaluator.
    pub fn user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Owned copy of the current user.
    pub fn snapshot(&self) -> Option<User> {
        self.current_user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
    }

    /// Store a freshly loaded user. Clears the loading flag and any error.
    pub fn set_user(&mut self, user: User) {
        tracing::info!(
            user_id = user.id.map(tracing::field::display),
            role = %user.role,
            "session user set"
        );
        self.current_user = Some(user);
        self.is_loading = false;
        self.error = None;
    }

    /// Drop the current user. The last error, if any, stays visible.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.current_user.take() {
            tracing::info!(user_id = user.id.map(tracing::field::display), "session user cleared");
        }
        self.is_loading = false;
    }

    /// Normalize and store a failure. Clears the loading flag.
    pub fn set_error(&mut self, value: impl Into<Caught>) {
        let err = normalize_error(value);
        tracing::warn!(kind = %err.kind, severity = %err.severity, message = %err.message, "auth error");
        self.error = Some(err);
        self.is_loading = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Permission, Role, has_permission};
    use merchantdesk_core::{ErrorKind, Severity, UNKNOWN_ERROR_MESSAGE, UserId};

    #[test]
    fn starts_signed_out() {
        let state = AuthState::new();
        assert!(state.user().is_none());
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert!(!has_permission(state.user(), Permission::OrdersView));
    }

    #[test]
    fn sign_in_flow() {
        let mut state = AuthState::new();
        state.begin_loading();
        assert!(state.is_loading());

        state.set_error("stale token");
        state.begin_loading();
        state.set_user(User::new(Role::Manager).with_id(UserId::new()));

        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert!(state.is_authenticated());
        assert!(has_permission(state.user(), Permission::UsersView));
    }

    #[test]
    fn set_error_normalizes_every_input() {
        let mut state = AuthState::new();
        state.begin_loading();

        state.set_error(std::io::Error::other("invalid credentials"));
        let err = state.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "invalid credentials");
        assert!(!state.is_loading());

        state.set_error(serde_json::json!(404));
        assert_eq!(state.error().unwrap().message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(state.error().unwrap().kind, ErrorKind::Unknown);

        let network = AppError::network("offline").with_severity(Severity::Warning);
        state.set_error(network.clone());
        assert_eq!(state.error(), Some(&network));

        state.clear_error();
        assert!(state.error().is_none());
    }

    #[test]
    fn sign_out_keeps_error_and_snapshot_is_independent() {
        let mut state = AuthState::new();
        state.set_user(User::new(Role::Staff));
        let snapshot = state.snapshot();

        state.set_error(AppError::authentication("session expired"));
        state.sign_out();

        assert!(state.user().is_none());
        assert!(state.error().is_some());
        assert_eq!(snapshot.map(|u| u.role), Some(Role::Staff));
    }
}
