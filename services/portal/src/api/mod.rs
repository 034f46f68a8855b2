//! HTTP API handlers and shared payload types.
pub mod access;
pub mod error;
pub mod navigation;
pub mod openapi;
pub mod session;
pub mod system;
pub mod types;
