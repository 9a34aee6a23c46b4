//! Configuration file loading
//!
//! Loads guard configuration from TOML files: the identity-provider
//! settings, guard options and the route-permission table.
//!
//! # Example
//!
//! ```rust,ignore
//! use routeguard::config::load_config;
//!
//! let config = load_config("guard.toml")?;
//! let guard = config.into_guard();
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{GuardError, Result};
use crate::guard::{GuardOptionsUpdate, IdentityConfig, PermissionTable, RouteGuard, RouteRules};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardFileConfig {
    /// Identity-provider section
    #[serde(default)]
    pub identity: Option<IdentityConfig>,

    /// Guard options section
    #[serde(default)]
    pub options: Option<GuardOptionsUpdate>,

    /// Route-permission table: pattern -> resource -> required roles
    #[serde(default)]
    pub routes: Option<HashMap<String, HashMap<String, Vec<String>>>>,
}

impl GuardFileConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config(path)
    }

    /// Get the identity-provider configuration
    pub fn identity_config(&self) -> Result<IdentityConfig> {
        self.identity.clone().ok_or_else(|| {
            GuardError::Config("identity configuration not found in config file".to_string())
        })
    }

    /// Build the permission table, if a `[routes]` section was given
    pub fn permission_table(&self) -> Option<PermissionTable> {
        self.routes.as_ref().map(|routes| {
            routes
                .iter()
                .map(|(pattern, rules)| {
                    let route_rules: RouteRules = rules
                        .iter()
                        .map(|(resource, roles)| (resource.clone(), roles.clone()))
                        .collect();
                    (pattern.clone(), route_rules)
                })
                .collect()
        })
    }

    /// Build a configured [`RouteGuard`] from this file
    pub fn into_guard(self) -> RouteGuard {
        let guard = RouteGuard::new();
        let table = self.permission_table();
        guard.configure(self.identity.unwrap_or_default(), table, self.options);
        guard
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GuardFileConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;

    toml::from_str(&content)
        .map_err(|e| GuardError::Config(format!("Failed to parse TOML config: {}", e)))
}
