use crate::{AccessError, RoutePath};
use serde::{Deserialize, Serialize};

/// Closed set of account roles.
///
/// A session carries exactly one role; changing it requires a new login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Rider,
    Driver,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Rider, Role::Driver, Role::Admin, Role::SuperAdmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Rider => "rider",
            Role::Driver => "driver",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Human readable label, used in notices and greetings.
    pub fn label(self) -> &'static str {
        match self {
            Role::Rider => "Rider",
            Role::Driver => "Driver",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }

    /// Dashboard a role lands on after login or after being turned away
    /// from a page it may not use.
    pub fn home(self) -> RoutePath {
        match self {
            Role::Rider => RoutePath::from_static("/rider/history"),
            Role::Driver => RoutePath::from_static("/driver/overview"),
            Role::Admin => RoutePath::from_static("/admin/analytics"),
            Role::SuperAdmin => RoutePath::from_static("/super-admin/analytics"),
        }
    }

    /// Path prefix under which the role's dashboard routes are mounted.
    pub fn prefix(self) -> &'static str {
        match self {
            Role::Rider => "/rider",
            Role::Driver => "/driver",
            Role::Admin => "/admin",
            Role::SuperAdmin => "/super-admin",
        }
    }

    /// Parse an optional role string, treating anything outside the closed
    /// set as no role at all.
    pub fn parse_lenient(value: Option<&str>) -> Option<Role> {
        let raw = value?;
        match raw.parse() {
            Ok(role) => Some(role),
            Err(_) => {
                tracing::warn!(role = raw, "unrecognized role; using public access");
                None
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AccessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // The remote API reports roles in upper case (`SUPER_ADMIN`).
        match value.trim().to_ascii_lowercase().as_str() {
            "rider" => Ok(Role::Rider),
            "driver" => Ok(Role::Driver),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(AccessError::UnknownRole(value.to_string())),
        }
    }
}
