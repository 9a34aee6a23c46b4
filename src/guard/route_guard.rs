//! Route resolution and authorization checking

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{GuardError, Result};
use super::capability::ResourceRoleSource;
use super::types::{GuardOptions, GuardOptionsUpdate, IdentityConfig, PermissionTable};

/// Route-based authorization guard
///
/// Holds the route-permission table, guard options, the identity-provider
/// settings and the currently active route, and evaluates whether the
/// authenticated principal may stay on that route. One instance is
/// constructed at application start and shared (`Arc<RouteGuard>`) between
/// the route-change notifier, the identity-client bootstrap and the route
/// guard; all methods take `&self`.
pub struct RouteGuard {
    state: RwLock<GuardState>,
}

struct GuardState {
    table: PermissionTable,
    options: GuardOptions,
    identity_config: IdentityConfig,
    current_route: String,
    init_callback: Arc<dyn Fn() + Send + Sync>,
    identity: Option<Arc<dyn ResourceRoleSource>>,
}

impl RouteGuard {
    /// Create a guard with the fallback permission table and default options
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GuardState {
                table: PermissionTable::default(),
                options: GuardOptions::default(),
                identity_config: IdentityConfig::default(),
                current_route: String::new(),
                init_callback: Arc::new(|| {}),
                identity: None,
            }),
        }
    }

    /// Establish or replace the guard configuration
    ///
    /// The identity settings are stored as-is. The permission table is
    /// replaced only when `routes` is given, otherwise the current table is
    /// kept. Options merge over the current values: supplied fields
    /// override, omitted fields keep what was there.
    pub fn configure(
        &self,
        identity: IdentityConfig,
        routes: Option<PermissionTable>,
        options: Option<GuardOptionsUpdate>,
    ) {
        let mut state = self.write_state();
        state.identity_config = identity;
        if let Some(routes) = routes {
            state.table = routes;
        }
        if let Some(update) = options {
            state.options.merge(update);
        }
    }

    /// Record the latest active route. Called by the hosting framework's
    /// route-change notification; only the most recent value is kept.
    pub fn set_current_route(&self, route: impl Into<String>) {
        self.write_state().current_route = route.into();
    }

    pub fn current_route(&self) -> String {
        self.read_state().current_route.clone()
    }

    /// Register the callback the identity-client integration invokes once
    /// its own initialization completes. The guard stores it and never
    /// invokes it itself.
    pub fn set_init_callback(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.write_state().init_callback = Arc::new(callback);
    }

    pub fn init_callback(&self) -> Arc<dyn Fn() + Send + Sync> {
        self.read_state().init_callback.clone()
    }

    /// Wire up the identity capability once the identity client is ready
    pub fn set_identity_source(&self, source: Arc<dyn ResourceRoleSource>) {
        self.write_state().identity = Some(source);
    }

    /// The stored identity-provider settings, for the host's identity-client
    /// bootstrap
    pub fn identity_config(&self) -> IdentityConfig {
        self.read_state().identity_config.clone()
    }

    /// Redirect target the host should use when a check fails
    pub fn unauthorized_url(&self) -> String {
        self.read_state().options.unauthorized_url.clone()
    }

    /// Resolve the configured route pattern applicable to the current route
    ///
    /// Walks the current route from its full segment list down, dropping one
    /// trailing segment per step. At each length an exact table entry wins
    /// over the wildcard candidate (all-but-last segments plus `*`). Returns
    /// `None` when nothing resolves under strict mode, or when the only
    /// resolution is a wildcard match and `allow_wildcard` is off; both
    /// cases are logged, never raised.
    pub fn resolve_route(&self) -> Option<String> {
        let state = self.read_state();
        Self::resolve_in(&state, &state.current_route)
    }

    fn resolve_in(state: &GuardState, route: &str) -> Option<String> {
        let mut segments: Vec<&str> = route.split('/').collect();
        let mut resolved: Option<String> = None;
        let mut is_wildcard_match = false;

        while resolved.is_none() && !segments.is_empty() {
            let exact = segments.join("/");
            let wildcard = {
                let mut parts = segments[..segments.len() - 1].to_vec();
                parts.push("*");
                parts.join("/")
            };

            if state.table.contains(&exact) {
                resolved = Some(exact);
            } else if state.table.contains(&wildcard) {
                resolved = Some(wildcard);
                is_wildcard_match = true;
            }

            segments.pop();
        }

        if (state.options.strict && resolved.is_none())
            || (is_wildcard_match && !state.options.allow_wildcard)
        {
            tracing::warn!(
                route = %route,
                strict = state.options.strict,
                wildcard = is_wildcard_match,
                "every route authorization must be defined while on strict mode"
            );
            return None;
        }

        resolved
    }

    /// Check whether the principal may access the current route
    ///
    /// Looks up the rule set for the resolved route; every required role of
    /// every resource in that set must be granted by the identity source.
    /// Denies on the first resource with a missing role. A route that
    /// resolves to no rule set denies as well. The only error is
    /// [`GuardError::MissingIdentitySource`], raised when the capability was
    /// never wired up; resolution failures never surface as errors.
    pub fn check_authorization(&self) -> Result<bool> {
        let state = self.read_state();
        Self::check_in(&state, &state.current_route)
    }

    /// Check a specific route, independent of the stored current route
    ///
    /// Resolves and evaluates `route` under a single read of the guard
    /// state, without mutating `current_route`. Concurrent callers (one
    /// guard instance serving many in-flight requests) must use this so a
    /// request is never checked against another request's route.
    pub fn check_authorization_for(&self, route: &str) -> Result<bool> {
        let state = self.read_state();
        Self::check_in(&state, route)
    }

    fn check_in(state: &GuardState, route: &str) -> Result<bool> {
        let identity = state
            .identity
            .as_ref()
            .ok_or(GuardError::MissingIdentitySource)?;

        let rules = match Self::resolve_in(state, route)
            .and_then(|pattern| state.table.get(&pattern))
        {
            Some(rules) => rules,
            None => {
                tracing::debug!(route = %route, "no permission rule set for route, denying");
                return Ok(false);
            }
        };

        for (resource, roles) in rules {
            let granted = roles
                .iter()
                .all(|role| identity.has_resource_role(role, resource));
            if !granted {
                tracing::debug!(resource = %resource, "required role missing, denying");
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, GuardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, GuardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}
