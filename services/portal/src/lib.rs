//! Portal service: HTTP surface for ridegate navigation and access decisions.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
