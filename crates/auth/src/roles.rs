use core::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Privilege tier assigned to a dashboard user.
///
/// Declaration order is privilege order (`Customer < Staff < Manager < Admin < SuperAdmin`),
/// so `Ord` answers hierarchy questions directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Staff,
    Manager,
    Admin,
    /// Universal role: satisfies every permission and every role check.
    SuperAdmin,
}

impl Role {
    /// The single role with universal access.
    pub const UNIVERSAL: Role = Role::SuperAdmin;

    /// Every role, least privileged first.
    pub const ALL: [Role; 5] = [
        Role::Customer,
        Role::Staff,
        Role::Manager,
        Role::Admin,
        Role::SuperAdmin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn is_universal(self) -> bool {
        self == Self::UNIVERSAL
    }

    /// Position in the hierarchy (0 = least privileged).
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Strictly more privileged than `other`.
    pub fn outranks(self, other: Role) -> bool {
        self > other
    }

    /// At least as privileged as `other`.
    pub fn at_least(self, other: Role) -> bool {
        self >= other
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// A set of roles, as accepted by role checks.
///
/// Built from a single role, an array, a slice, a `Vec` or any iterator, so
/// callers can write `has_role(user, Role::Admin)` or
/// `has_role(user, [Role::Manager, Role::Staff])` alike.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);

    pub const fn new() -> Self {
        Self::EMPTY
    }

    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members, least privileged first.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl From<Role> for RoleSet {
    fn from(value: Role) -> Self {
        Self::EMPTY.with(value)
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(value: [Role; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<const N: usize> From<&[Role; N]> for RoleSet {
    fn from(value: &[Role; N]) -> Self {
        value.iter().copied().collect()
    }
}

impl From<&[Role]> for RoleSet {
    fn from(value: &[Role]) -> Self {
        value.iter().copied().collect()
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(value: Vec<Role>) -> Self {
        value.into_iter().collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::EMPTY;
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl core::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("[")?;
        for (i, role) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(role.as_str())?;
        }
        f.write_str("]")
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
