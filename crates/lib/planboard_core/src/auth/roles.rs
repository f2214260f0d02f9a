//! Project role hierarchy.
//!
//! The single definition of `VIEWER < MEMBER < ADMIN < OWNER`. Every
//! permission check, in this crate or above it, goes through [`Role`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A project role. Variant order is the permission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Viewer,
    Member,
    Admin,
    Owner,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Viewer, Role::Member, Role::Admin, Role::Owner];

    /// Integer rank: VIEWER=1 .. OWNER=4.
    pub fn rank(self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::Member => 2,
            Role::Admin => 3,
            Role::Owner => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "VIEWER",
            Role::Member => "MEMBER",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
        }
    }

    /// Normalise role text, ignoring ASCII case. Unknown text is `None`.
    pub fn parse(text: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(text.trim()))
    }

    /// True when this role grants at least `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role text outside the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Rank of role text, or `None` when it is not a known role.
pub fn rank_of(role: &str) -> Option<u8> {
    Role::parse(role).map(Role::rank)
}

/// True iff both roles are known and `user_role` ranks at or above
/// `required_role`. Unknown text on either side denies.
pub fn satisfies(user_role: &str, required_role: &str) -> bool {
    match (Role::parse(user_role), Role::parse(required_role)) {
        (Some(user), Some(required)) => user.satisfies(required),
        _ => false,
    }
}
