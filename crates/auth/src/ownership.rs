//! Resource ownership lookups for resource-scoped permissions.

use std::collections::HashMap;

use merchantdesk_core::MerchantId;

use crate::User;

/// Answers "does this resource belong to this user?".
///
/// Supplied by the data layer. Implementations must not panic; an unknown
/// resource is simply not owned.
pub trait OwnershipLookup {
    fn is_owned_by(&self, resource_id: &str, user: &User) -> bool;
}

impl<F> OwnershipLookup for F
where
    F: Fn(&str, &User) -> bool,
{
    fn is_owned_by(&self, resource_id: &str, user: &User) -> bool {
        self(resource_id, user)
    }
}

/// In-memory `resource id -> owning merchant` map.
///
/// A resource is owned by a user when the user acts for the same merchant.
#[derive(Debug, Clone, Default)]
pub struct MerchantOwnership {
    owners: HashMap<String, MerchantId>,
}

impl MerchantOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the owner of a resource, returning the previous owner.
    pub fn insert(&mut self, resource_id: impl Into<String>, merchant_id: MerchantId) -> Option<MerchantId> {
        self.owners.insert(resource_id.into(), merchant_id)
    }

    pub fn with(mut self, resource_id: impl Into<String>, merchant_id: MerchantId) -> Self {
        self.insert(resource_id, merchant_id);
        self
    }

    pub fn owner_of(&self, resource_id: &str) -> Option<MerchantId> {
        self.owners.get(resource_id).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl OwnershipLookup for MerchantOwnership {
    fn is_owned_by(&self, resource_id: &str, user: &User) -> bool {
        match (self.owner_of(resource_id), user.merchant_id) {
            (Some(owner), Some(merchant)) => owner == merchant,
            _ => false,
        }
    }
}

/// Lookup that never confirms ownership.
#[derive(Debug, Copy, Clone, Default)]
pub struct DenyAll;

impl OwnershipLookup for DenyAll {
    fn is_owned_by(&self, _resource_id: &str, _user: &User) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn owner_merchant_matches() {
        let mine = MerchantId::new();
        let theirs = MerchantId::new();
        let lookup = MerchantOwnership::new().with("order-1", mine).with("order-2", theirs);

        let user = User::new(Role::Manager).with_merchant(mine);
        assert!(lookup.is_owned_by("order-1", &user));
        assert!(!lookup.is_owned_by("order-2", &user));
        assert!(!lookup.is_owned_by("order-404", &user));
    }

    #[test]
    fn user_without_merchant_owns_nothing() {
        let merchant = MerchantId::new();
        let lookup = MerchantOwnership::new().with("order-1", merchant);
        assert!(!lookup.is_owned_by("order-1", &User::new(Role::Admin)));
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |resource_id: &str, _: &User| resource_id.starts_with("own-");
        let user = User::new(Role::Staff);
        assert!(lookup.is_owned_by("own-7", &user));
        assert!(!DenyAll.is_owned_by("own-7", &user));
    }
}
