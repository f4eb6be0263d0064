use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Logistics,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Logistics => write!(f, "logistics"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "logistics" => Ok(UserRole::Logistics),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

/// A user account created by the seed workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSeed {
    pub username: &'static str,
    pub email: &'static str,
    pub role: UserRole,
}

/// Default accounts every fresh installation starts with.
pub const DEFAULT_USERS: [UserSeed; 2] = [
    UserSeed {
        username: "admin",
        email: "admin@example.com",
        role: UserRole::Admin,
    },
    UserSeed {
        username: "logistics",
        email: "logistics@example.com",
        role: UserRole::Logistics,
    },
];
