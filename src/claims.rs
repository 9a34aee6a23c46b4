//! Token claims and their resource-role view
//!
//! The guard only needs a [`ResourceRoleSource`]; this module provides one
//! backed by the claims of an already-validated token, reading the
//! Keycloak-style `resource_access.{resource}.roles` and
//! `realm_access.roles` claim layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::guard::capability::ResourceRoleSource;

/// Claims of a validated identity token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    #[serde(default)]
    pub sub: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Preferred username
    pub preferred_username: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Additional custom claims, including role claims
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TokenClaims {
    /// Check if the claims grant a role on a specific resource
    pub fn has_resource_role(&self, role: &str, resource: &str) -> bool {
        self.roles_for(resource)
            .map(|roles| roles.iter().any(|r| r == role))
            .unwrap_or(false)
    }

    /// Check if the claims grant a realm-level role
    pub fn has_realm_role(&self, role: &str) -> bool {
        if let Some(Value::Object(realm_access)) = self.extra.get("realm_access") {
            if let Some(Value::Array(roles)) = realm_access.get("roles") {
                return roles.iter().any(|r| matches!(r, Value::String(s) if s == role));
            }
        }
        false
    }

    /// Check if the claims grant every listed role on the resource
    pub fn has_all_resource_roles(&self, roles: &[&str], resource: &str) -> bool {
        roles
            .iter()
            .all(|&role| self.has_resource_role(role, resource))
    }

    /// All roles granted on a resource (empty if the claim is absent or has
    /// an unexpected shape)
    pub fn resource_roles(&self, resource: &str) -> Vec<String> {
        self.roles_for(resource).unwrap_or_default()
    }

    fn roles_for(&self, resource: &str) -> Option<Vec<String>> {
        let Value::Object(resource_access) = self.extra.get("resource_access")? else {
            return None;
        };
        let Value::Object(entry) = resource_access.get(resource)? else {
            return None;
        };
        let Value::Array(roles) = entry.get("roles")? else {
            return None;
        };
        Some(
            roles
                .iter()
                .filter_map(|r| {
                    if let Value::String(s) = r {
                        Some(s.clone())
                    } else {
                        None
                    }
                })
                .collect(),
        )
    }
}

impl ResourceRoleSource for TokenClaims {
    fn has_resource_role(&self, role: &str, resource: &str) -> bool {
        TokenClaims::has_resource_role(self, role, resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_resource_roles(resource: &str, roles: Vec<&str>) -> TokenClaims {
        let mut extra = HashMap::new();
        extra.insert(
            "resource_access".to_string(),
            serde_json::json!({
                resource: { "roles": roles }
            }),
        );

        TokenClaims {
            sub: "user123".to_string(),
            iss: "test-issuer".to_string(),
            preferred_username: None,
            email: None,
            extra,
        }
    }

    #[test]
    fn test_has_resource_role() {
        let claims = claims_with_resource_roles("adminPanel", vec!["admin", "viewer"]);

        assert!(claims.has_resource_role("admin", "adminPanel"));
        assert!(claims.has_resource_role("viewer", "adminPanel"));
        assert!(!claims.has_resource_role("superadmin", "adminPanel"));
        assert!(!claims.has_resource_role("admin", "otherResource"));
    }

    #[test]
    fn test_has_resource_role_missing_claim() {
        let claims = TokenClaims::default();
        assert!(!claims.has_resource_role("admin", "adminPanel"));
    }

    #[test]
    fn test_has_resource_role_non_object_claim() {
        let mut extra = HashMap::new();
        extra.insert(
            "resource_access".to_string(),
            Value::String("admin".to_string()),
        );
        let claims = TokenClaims {
            extra,
            ..Default::default()
        };

        assert!(!claims.has_resource_role("admin", "adminPanel"));
    }

    #[test]
    fn test_has_resource_role_non_string_roles_skipped() {
        let mut extra = HashMap::new();
        extra.insert(
            "resource_access".to_string(),
            serde_json::json!({
                "adminPanel": { "roles": [42, "admin"] }
            }),
        );
        let claims = TokenClaims {
            extra,
            ..Default::default()
        };

        assert!(claims.has_resource_role("admin", "adminPanel"));
        assert_eq!(claims.resource_roles("adminPanel"), vec!["admin"]);
    }

    #[test]
    fn test_has_realm_role() {
        let mut extra = HashMap::new();
        extra.insert(
            "realm_access".to_string(),
            serde_json::json!({ "roles": ["offline_access", "uma_authorization"] }),
        );
        let claims = TokenClaims {
            extra,
            ..Default::default()
        };

        assert!(claims.has_realm_role("offline_access"));
        assert!(!claims.has_realm_role("admin"));
    }

    #[test]
    fn test_has_all_resource_roles() {
        let claims = claims_with_resource_roles("deploy", vec!["operator", "approver"]);

        assert!(claims.has_all_resource_roles(&["operator", "approver"], "deploy"));
        assert!(!claims.has_all_resource_roles(&["operator", "admin"], "deploy"));
    }

    #[test]
    fn test_resource_roles_extraction() {
        let claims = claims_with_resource_roles("adminPanel", vec!["admin", "viewer"]);

        assert_eq!(claims.resource_roles("adminPanel"), vec!["admin", "viewer"]);
        assert_eq!(claims.resource_roles("missing"), Vec::<String>::new());
    }

    #[test]
    fn test_deserialize_keycloak_shaped_token() {
        let json = r#"{
            "sub": "f:1234:user",
            "iss": "https://idp.example.com/realms/main",
            "preferred_username": "jdoe",
            "resource_access": {
                "adminPanel": { "roles": ["admin"] }
            },
            "realm_access": { "roles": ["offline_access"] }
        }"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.preferred_username.as_deref(), Some("jdoe"));
        assert!(claims.has_resource_role("admin", "adminPanel"));
        assert!(claims.has_realm_role("offline_access"));
    }

    #[test]
    fn test_claims_as_resource_role_source() {
        let claims = claims_with_resource_roles("adminPanel", vec!["admin"]);
        let source: &dyn ResourceRoleSource = &claims;

        assert!(source.has_resource_role("admin", "adminPanel"));
    }
}
