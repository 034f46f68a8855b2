//! Route table builder.
//!
//! # Purpose
//! Flattens a role's navigation into router bindings and resolves concrete
//! paths against them.
//!
//! # Key invariants
//! - Binding order is section order, then entry order.
//! - Resolution is first match wins; later duplicates are reported by
//!   [`RouteTable::shadowed`] rather than dropped.
use crate::{NavSection, Role, RoutePath, ViewId, sections_for};
use serde::Serialize;

/// One router binding from a path pattern to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteBinding {
    pub path: RoutePath,
    pub view: ViewId,
}

/// Flatten sections into router bindings, section order then entry order.
///
/// Duplicated paths are kept; [`RouteTable::resolve`] picks the first.
pub fn flatten(sections: &[NavSection]) -> Vec<RouteBinding> {
    sections
        .iter()
        .flat_map(|section| section.entries)
        .map(|entry| RouteBinding {
            path: entry.url.clone(),
            view: entry.view,
        })
        .collect()
}

/// Bindings for a role's dashboard, or the public site when `None`.
pub fn generate_routes(role: Option<Role>) -> Vec<RouteBinding> {
    flatten(sections_for(role))
}

/// Match a concrete path against a router pattern.
///
/// `:name` matches exactly one non-empty segment and a trailing `*` matches
/// any remainder, including nothing.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/').filter(|s| !s.is_empty());
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (Some("*"), _) => return pattern_segments.next().is_none(),
            (Some(expected), Some(actual)) => {
                if !expected.starts_with(':') && expected != actual {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Ordered bindings with first-match-wins resolution.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl RouteTable {
    pub fn new(bindings: Vec<RouteBinding>) -> Self {
        Self { bindings }
    }

    pub fn from_sections(sections: &[NavSection]) -> Self {
        Self::new(flatten(sections))
    }

    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }

    pub fn resolve(&self, path: &str) -> Option<&RouteBinding> {
        self.bindings
            .iter()
            .find(|binding| path_matches(binding.path.as_str(), path))
    }

    /// Bindings that can never be reached because an earlier binding has the
    /// same pattern.
    pub fn shadowed(&self) -> Vec<&RouteBinding> {
        self.bindings
            .iter()
            .enumerate()
            .filter(|(idx, binding)| {
                self.bindings[..*idx]
                    .iter()
                    .any(|earlier| earlier.path == binding.path)
            })
            .map(|(_, binding)| binding)
            .collect()
    }
}
