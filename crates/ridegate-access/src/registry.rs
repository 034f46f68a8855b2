//! Role registry: the navigation each role is offered.
//!
//! # Purpose
//! Declares, per role, the ordered sidebar sections and their entries. The
//! same tables feed the route table builder, so a view is routable for a
//! role exactly when it appears in that role's navigation.
//!
//! # Key invariants
//! - Every role has a non-empty, fixed navigation.
//! - No role (unauthenticated or unrecognized) gets the public navigation,
//!   the most restrictive set.
//! - Each role's [`Role::home`] is one of its entries.
//!
//! # Examples
//! ```rust
//! use ridegate_access::{Role, sections_for};
//!
//! let sections = sections_for(Some(Role::Driver));
//! assert_eq!(sections[0].title, "Dashboard");
//! ```
use crate::{Role, RoutePath, ViewId};
use serde::Serialize;

/// A labeled link to one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub title: &'static str,
    pub url: RoutePath,
    pub view: ViewId,
}

/// Ordered group of entries rendered under a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub entries: &'static [NavEntry],
}

const fn entry(title: &'static str, url: &'static str, view: ViewId) -> NavEntry {
    NavEntry {
        title,
        url: RoutePath::from_static(url),
        view,
    }
}

const PUBLIC_NAV: &[NavSection] = &[NavSection {
    title: "Explore",
    entries: &[
        entry("Home", "/", ViewId::Home),
        entry("Book a Ride", "/book-ride", ViewId::BookRide),
        entry("Fares", "/fares", ViewId::Fares),
        entry("Features", "/features", ViewId::Features),
        entry("About", "/about", ViewId::About),
        entry("Contact", "/contact", ViewId::Contact),
        entry("FAQ", "/faq", ViewId::Faq),
    ],
}];

const RIDER_NAV: &[NavSection] = &[
    NavSection {
        title: "Rides",
        entries: &[
            entry("Ride History", "/rider/history", ViewId::RideHistory),
            entry("Active Ride", "/rider/active-ride", ViewId::ActiveRide),
        ],
    },
    NavSection {
        title: "Account",
        entries: &[
            entry("Profile", "/rider/profile", ViewId::Profile),
            entry("Wallet", "/rider/wallet", ViewId::Wallet),
            entry("Payments", "/rider/payments", ViewId::Payments),
        ],
    },
];

const DRIVER_NAV: &[NavSection] = &[
    NavSection {
        title: "Dashboard",
        entries: &[
            entry("Overview", "/driver/overview", ViewId::DriverOverview),
            entry("Ride Requests", "/driver/requests", ViewId::RideRequests),
            entry("Earnings", "/driver/earnings", ViewId::Earnings),
            entry("Ride History", "/driver/history", ViewId::RideHistory),
        ],
    },
    NavSection {
        title: "Account",
        entries: &[
            entry("Profile", "/driver/profile", ViewId::Profile),
            entry("Vehicle", "/driver/vehicle", ViewId::Vehicle),
            entry("Wallet", "/driver/wallet", ViewId::Wallet),
        ],
    },
];

const ADMIN_NAV: &[NavSection] = &[
    NavSection {
        title: "Dashboard",
        entries: &[entry("Analytics", "/admin/analytics", ViewId::Analytics)],
    },
    NavSection {
        title: "Management",
        entries: &[
            entry("Users", "/admin/users", ViewId::ManageUsers),
            entry("Drivers", "/admin/drivers", ViewId::ManageDrivers),
            entry("Rides", "/admin/rides", ViewId::ManageRides),
        ],
    },
    NavSection {
        title: "Account",
        entries: &[entry("Profile", "/admin/profile", ViewId::Profile)],
    },
];

const SUPER_ADMIN_NAV: &[NavSection] = &[
    NavSection {
        title: "Dashboard",
        entries: &[entry(
            "Analytics",
            "/super-admin/analytics",
            ViewId::Analytics,
        )],
    },
    NavSection {
        title: "Management",
        entries: &[
            entry("Users", "/super-admin/users", ViewId::ManageUsers),
            entry("Drivers", "/super-admin/drivers", ViewId::ManageDrivers),
            entry("Rides", "/super-admin/rides", ViewId::ManageRides),
        ],
    },
    NavSection {
        title: "Administration",
        entries: &[entry("Admins", "/super-admin/admins", ViewId::ManageAdmins)],
    },
    NavSection {
        title: "Account",
        entries: &[entry("Profile", "/super-admin/profile", ViewId::Profile)],
    },
];

/// Navigation sections for a role, in render order.
pub fn sections_for(role: Option<Role>) -> &'static [NavSection] {
    match role {
        None => PUBLIC_NAV,
        Some(Role::Rider) => RIDER_NAV,
        Some(Role::Driver) => DRIVER_NAV,
        Some(Role::Admin) => ADMIN_NAV,
        Some(Role::SuperAdmin) => SUPER_ADMIN_NAV,
    }
}
