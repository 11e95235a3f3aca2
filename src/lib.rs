//! Group-aware access rule and the small axum host that runs it.
//!
//! The `groups` rule narrows the configured users to those in the request's groups, tries
//! their credential checks one at a time, and reports the acting group of the first match.

pub mod acl;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
