//! User snapshot consumed by the evaluator.
//!
//! The session layer owns user records; this crate only sees an immutable
//! snapshot of the fields that matter for authorization.

use serde::{Deserialize, Serialize};

use merchantdesk_core::{MerchantId, UserId};

use crate::Role;

/// The minimal user shape required for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,

    /// Merchant (tenant) the user acts for. Resource-scoped grants require it.
    #[serde(default, alias = "merchantId", skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<MerchantId>,
}

impl User {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            id: None,
            merchant_id: None,
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_merchant(mut self, merchant_id: MerchantId) -> Self {
        self.merchant_id = Some(merchant_id);
        self
    }

    pub fn is_universal(&self) -> bool {
        self.role.is_universal()
    }
}
