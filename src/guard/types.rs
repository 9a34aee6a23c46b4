//! Common types for route authorization

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Required roles per protected resource for one route pattern
pub type RouteRules = HashMap<String, Vec<String>>;

/// Route-pattern to permission-rule mapping
///
/// Keys are `/`-delimited route patterns. A `*` segment matches any single
/// path segment at that position; the bare key `*` is the fallback entry
/// covering all routes. Values map resource names to the ordered list of
/// roles the principal must hold on that resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    entries: HashMap<String, RouteRules>,
}

impl PermissionTable {
    /// Create an empty table (no fallback entry)
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or replace the rules for a route pattern. Last write wins.
    pub fn insert(&mut self, pattern: impl Into<String>, rules: RouteRules) -> &mut Self {
        self.entries.insert(pattern.into(), rules);
        self
    }

    /// Insert or replace a single resource requirement under a route pattern
    pub fn require(
        &mut self,
        pattern: impl Into<String>,
        resource: impl Into<String>,
        roles: Vec<String>,
    ) -> &mut Self {
        self.entries
            .entry(pattern.into())
            .or_default()
            .insert(resource.into(), roles);
        self
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.contains_key(pattern)
    }

    pub fn get(&self, pattern: &str) -> Option<&RouteRules> {
        self.entries.get(pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PermissionTable {
    /// The fallback table: `*` with an empty-resource/empty-role rule
    fn default() -> Self {
        let mut entries = HashMap::new();
        let mut rules = RouteRules::new();
        rules.insert(String::new(), vec![String::new()]);
        entries.insert("*".to_string(), rules);
        Self { entries }
    }
}

impl FromIterator<(String, RouteRules)> for PermissionTable {
    fn from_iter<I: IntoIterator<Item = (String, RouteRules)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Guard behavior options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardOptions {
    /// Require every route to have an explicit, non-wildcard entry
    #[serde(default)]
    pub strict: bool,

    /// Redirect target when an authorization check fails
    #[serde(default = "default_unauthorized_url")]
    pub unauthorized_url: String,

    /// Accept wildcard matches outside strict mode. Off by default: the
    /// upstream behavior rejects wildcard matches in every mode, which
    /// looks like an operator-precedence slip but is preserved until the
    /// intent is clarified.
    #[serde(default)]
    pub allow_wildcard: bool,
}

fn default_unauthorized_url() -> String {
    "/".to_string()
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            strict: false,
            unauthorized_url: default_unauthorized_url(),
            allow_wildcard: false,
        }
    }
}

impl GuardOptions {
    /// Merge a partial update over these options. Supplied fields override,
    /// omitted fields keep their current values. An empty unauthorized_url
    /// falls back to `/`.
    pub fn merge(&mut self, update: GuardOptionsUpdate) {
        if let Some(strict) = update.strict {
            self.strict = strict;
        }
        if let Some(url) = update.unauthorized_url {
            self.unauthorized_url = if url.is_empty() {
                default_unauthorized_url()
            } else {
                url
            };
        }
        if let Some(allow) = update.allow_wildcard {
            self.allow_wildcard = allow;
        }
    }
}

/// Partial [`GuardOptions`] for merge-style configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardOptionsUpdate {
    #[serde(default)]
    pub strict: Option<bool>,

    #[serde(default)]
    pub unauthorized_url: Option<String>,

    #[serde(default)]
    pub allow_wildcard: Option<bool>,
}

/// Identity-provider settings
///
/// Held verbatim for the hosting application's identity-client bootstrap;
/// the guard itself never interprets these fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Identity provider base URL
    #[serde(default)]
    pub url: String,

    /// Realm name
    #[serde(default)]
    pub realm: String,

    /// Client ID
    #[serde(default)]
    pub client_id: String,

    /// Additional provider-specific settings, passed through untouched
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_fallback() {
        let table = PermissionTable::default();
        assert!(table.contains("*"));
        let rules = table.get("*").unwrap();
        assert_eq!(rules.get(""), Some(&vec![String::new()]));
    }

    #[test]
    fn test_insert_last_write_wins() {
        let mut table = PermissionTable::new();
        let mut first = RouteRules::new();
        first.insert("panel".to_string(), vec!["viewer".to_string()]);
        let mut second = RouteRules::new();
        second.insert("panel".to_string(), vec!["admin".to_string()]);

        table.insert("/admin", first);
        table.insert("/admin", second);

        let rules = table.get("/admin").unwrap();
        assert_eq!(rules.get("panel"), Some(&vec!["admin".to_string()]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_require_builder() {
        let mut table = PermissionTable::new();
        table
            .require("/admin", "adminPanel", vec!["admin".to_string()])
            .require("/admin", "audit", vec!["auditor".to_string()]);

        let rules = table.get("/admin").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("audit"), Some(&vec!["auditor".to_string()]));
    }

    #[test]
    fn test_options_defaults() {
        let options = GuardOptions::default();
        assert!(!options.strict);
        assert_eq!(options.unauthorized_url, "/");
        assert!(!options.allow_wildcard);
    }

    #[test]
    fn test_options_merge_partial() {
        let mut options = GuardOptions::default();
        options.merge(GuardOptionsUpdate {
            strict: Some(true),
            ..Default::default()
        });

        assert!(options.strict);
        assert_eq!(options.unauthorized_url, "/");
    }

    #[test]
    fn test_options_merge_empty_url_falls_back() {
        let mut options = GuardOptions::default();
        options.merge(GuardOptionsUpdate {
            unauthorized_url: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(options.unauthorized_url, "/");
    }

    #[test]
    fn test_options_merge_keeps_unspecified() {
        let mut options = GuardOptions {
            strict: true,
            unauthorized_url: "/login".to_string(),
            allow_wildcard: true,
        };
        options.merge(GuardOptionsUpdate::default());

        assert!(options.strict);
        assert_eq!(options.unauthorized_url, "/login");
        assert!(options.allow_wildcard);
    }

    #[test]
    fn test_identity_config_extra_flattened() {
        let json = r#"{
            "url": "https://idp.example.com",
            "realm": "main",
            "client_id": "spa",
            "sslRequired": "external"
        }"#;
        let config: IdentityConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.url, "https://idp.example.com");
        assert_eq!(config.realm, "main");
        assert_eq!(
            config.extra.get("sslRequired"),
            Some(&Value::String("external".to_string()))
        );
    }
}
