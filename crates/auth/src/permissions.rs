use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fine-grained capability token.
///
/// Each permission has a stable dotted name (`"<module>.<action>"`, e.g.
/// `"orders.edit"`). Some permissions are *resource-scoped*: when checked
/// against a specific resource instance, the grant also requires that the
/// resource belongs to the user's merchant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "users.view")]
    UsersView,
    #[serde(rename = "users.create")]
    UsersCreate,
    #[serde(rename = "users.edit")]
    UsersEdit,
    #[serde(rename = "users.delete")]
    UsersDelete,

    #[serde(rename = "orders.view")]
    OrdersView,
    #[serde(rename = "orders.create")]
    OrdersCreate,
    #[serde(rename = "orders.edit")]
    OrdersEdit,
    #[serde(rename = "orders.delete")]
    OrdersDelete,
    #[serde(rename = "orders.refund")]
    OrdersRefund,

    #[serde(rename = "products.view")]
    ProductsView,
    #[serde(rename = "products.create")]
    ProductsCreate,
    #[serde(rename = "products.edit")]
    ProductsEdit,
    #[serde(rename = "products.delete")]
    ProductsDelete,

    #[serde(rename = "customers.view")]
    CustomersView,
    #[serde(rename = "customers.edit")]
    CustomersEdit,

    #[serde(rename = "reports.view")]
    ReportsView,
    #[serde(rename = "reports.export")]
    ReportsExport,

    #[serde(rename = "payments.view")]
    PaymentsView,
    #[serde(rename = "payments.refund")]
    PaymentsRefund,

    #[serde(rename = "merchants.view")]
    MerchantsView,
    #[serde(rename = "merchants.edit")]
    MerchantsEdit,

    #[serde(rename = "settings.view")]
    SettingsView,
    #[serde(rename = "settings.edit")]
    SettingsEdit,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 23] = [
        Permission::UsersView,
        Permission::UsersCreate,
        Permission::UsersEdit,
        Permission::UsersDelete,
        Permission::OrdersView,
        Permission::OrdersCreate,
        Permission::OrdersEdit,
        Permission::OrdersDelete,
        Permission::OrdersRefund,
        Permission::ProductsView,
        Permission::ProductsCreate,
        Permission::ProductsEdit,
        Permission::ProductsDelete,
        Permission::CustomersView,
        Permission::CustomersEdit,
        Permission::ReportsView,
        Permission::ReportsExport,
        Permission::PaymentsView,
        Permission::PaymentsRefund,
        Permission::MerchantsView,
        Permission::MerchantsEdit,
        Permission::SettingsView,
        Permission::SettingsEdit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::UsersView => "users.view",
            Permission::UsersCreate => "users.create",
            Permission::UsersEdit => "users.edit",
            Permission::UsersDelete => "users.delete",
            Permission::OrdersView => "orders.view",
            Permission::OrdersCreate => "orders.create",
            Permission::OrdersEdit => "orders.edit",
            Permission::OrdersDelete => "orders.delete",
            Permission::OrdersRefund => "orders.refund",
            Permission::ProductsView => "products.view",
            Permission::ProductsCreate => "products.create",
            Permission::ProductsEdit => "products.edit",
            Permission::ProductsDelete => "products.delete",
            Permission::CustomersView => "customers.view",
            Permission::CustomersEdit => "customers.edit",
            Permission::ReportsView => "reports.view",
            Permission::ReportsExport => "reports.export",
            Permission::PaymentsView => "payments.view",
            Permission::PaymentsRefund => "payments.refund",
            Permission::MerchantsView => "merchants.view",
            Permission::MerchantsEdit => "merchants.edit",
            Permission::SettingsView => "settings.view",
            Permission::SettingsEdit => "settings.edit",
        }
    }

    /// Module part of the name (`"orders"` for `orders.edit`).
    pub fn category(self) -> &'static str {
        let name = self.as_str();
        name.split_once('.').map_or(name, |(module, _)| module)
    }

    /// Action part of the name (`"edit"` for `orders.edit`).
    pub fn action(self) -> &'static str {
        let name = self.as_str();
        name.split_once('.').map_or(name, |(_, action)| action)
    }

    /// Whether a check against a specific resource must confirm ownership.
    pub fn is_resource_scoped(self) -> bool {
        matches!(
            self,
            Permission::UsersEdit
                | Permission::UsersDelete
                | Permission::OrdersEdit
                | Permission::OrdersDelete
                | Permission::OrdersRefund
                | Permission::ProductsEdit
                | Permission::ProductsDelete
                | Permission::CustomersEdit
                | Permission::PaymentsRefund
                | Permission::MerchantsEdit
        )
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission '{0}'")]
pub struct ParsePermissionError(pub String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePermissionError(s.to_string()))
    }
}
