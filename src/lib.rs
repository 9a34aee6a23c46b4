//! # routeguard - Route-based authorization for OIDC-backed SPAs
//!
//! A Rust library for route-level authorization against an OIDC/Keycloak
//! style identity provider: a route-pattern to resource-role table, a
//! resolver for the currently active route, and an authorization check
//! against the principal's resource roles.
//!
//! ## Features
//!
//! - `axum`: tower middleware that guards requests and redirects denied
//!   ones to the configured unauthorized URL

pub mod error;
pub use error::{GuardError, Result};

pub mod guard;
pub mod claims;
pub mod config;

#[cfg(feature = "axum")]
pub mod axum_integration;

// Re-export commonly used types at crate root
pub use crate::claims::TokenClaims;
pub use crate::config::GuardFileConfig;
pub use crate::guard::{
    GuardOptions, GuardOptionsUpdate, IdentityConfig, PermissionTable, ResourceRoleSource,
    RouteGuard, RouteRules,
};
