//! Typed route paths and view identifiers.
//!
//! # Purpose
//! Wraps path strings so redirect targets, navigation URLs, and router
//! patterns cannot be confused with titles or arbitrary text.
//!
//! # Key invariants
//! - A [`RoutePath`] always starts with `/` and contains no whitespace.
//! - Static paths are borrowed; parsed paths own their string.
//!
//! # Examples
//! ```rust
//! use ridegate_access::RoutePath;
//!
//! let path = RoutePath::parse("/rider/wallet").expect("valid path");
//! assert_eq!(path.segments().collect::<Vec<_>>(), vec!["rider", "wallet"]);
//! ```
use crate::{AccessError, AccessResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Absolute application path such as `/driver/earnings`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(Cow<'static, str>);

impl RoutePath {
    /// Wrap a path literal. Callers guarantee the literal is absolute.
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Validate and wrap an owned path.
    ///
    /// # Errors
    /// - [`AccessError::InvalidPath`] when the value is not absolute or
    ///   contains whitespace.
    pub fn parse(value: impl Into<String>) -> AccessResult<Self> {
        let value = value.into();
        if !value.starts_with('/') || value.chars().any(char::is_whitespace) {
            return Err(AccessError::InvalidPath(value));
        }
        Ok(Self(Cow::Owned(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty `/`-separated segments. The root path has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// True when `self` equals `prefix` or sits below it.
    pub fn starts_with_segment(&self, prefix: &str) -> bool {
        match self.0.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl TryFrom<String> for RoutePath {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RoutePath> for String {
    fn from(value: RoutePath) -> Self {
        value.0.into_owned()
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every view the router can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    Home,
    BookRide,
    Fares,
    Features,
    About,
    Contact,
    Faq,
    Login,
    Register,
    GoogleCallback,
    Verify,
    Unauthorized,
    RideHistory,
    ActiveRide,
    Profile,
    Wallet,
    Payments,
    DriverOverview,
    RideRequests,
    Earnings,
    Vehicle,
    Analytics,
    ManageUsers,
    ManageDrivers,
    ManageRides,
    ManageAdmins,
}

impl ViewId {
    /// Stable name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewId::Home => "home",
            ViewId::BookRide => "book_ride",
            ViewId::Fares => "fares",
            ViewId::Features => "features",
            ViewId::About => "about",
            ViewId::Contact => "contact",
            ViewId::Faq => "faq",
            ViewId::Login => "login",
            ViewId::Register => "register",
            ViewId::GoogleCallback => "google_callback",
            ViewId::Verify => "verify",
            ViewId::Unauthorized => "unauthorized",
            ViewId::RideHistory => "ride_history",
            ViewId::ActiveRide => "active_ride",
            ViewId::Profile => "profile",
            ViewId::Wallet => "wallet",
            ViewId::Payments => "payments",
            ViewId::DriverOverview => "driver_overview",
            ViewId::RideRequests => "ride_requests",
            ViewId::Earnings => "earnings",
            ViewId::Vehicle => "vehicle",
            ViewId::Analytics => "analytics",
            ViewId::ManageUsers => "manage_users",
            ViewId::ManageDrivers => "manage_drivers",
            ViewId::ManageRides => "manage_rides",
            ViewId::ManageAdmins => "manage_admins",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_relative_and_blank_paths() {
        assert!(RoutePath::parse("rider/wallet").is_err());
        assert!(RoutePath::parse("").is_err());
        assert!(RoutePath::parse("/rider wallet").is_err());
        assert!(RoutePath::parse("/").is_ok());
    }

    #[test]
    fn view_names_match_serialized_form() {
        let json = serde_json::to_value(ViewId::GoogleCallback).expect("serialize");
        assert_eq!(json, ViewId::GoogleCallback.as_str());
    }

    #[test]
    fn root_has_no_segments() {
        assert_eq!(RoutePath::from_static("/").segments().count(), 0);
    }

    #[test]
    fn segment_prefix_respects_boundaries() {
        let path = RoutePath::from_static("/admin/users");
        assert!(path.starts_with_segment("/admin"));
        assert!(!path.starts_with_segment("/adm"));
        assert!(RoutePath::from_static("/admin").starts_with_segment("/admin"));
    }

    #[test]
    fn static_and_parsed_paths_compare_equal() {
        let parsed = RoutePath::parse("/fares".to_string()).expect("path");
        assert_eq!(parsed, RoutePath::from_static("/fares"));
    }

    #[test]
    fn serde_validates_paths() {
        let path: RoutePath = serde_json::from_str("\"/verify\"").expect("decode");
        assert_eq!(path.as_str(), "/verify");
        assert!(serde_json::from_str::<RoutePath>("\"verify\"").is_err());
    }
}
