//! Security definitions for the document and per-route security requirements.

use crate::error::{Error, Result};
use crate::route::Route;
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Produces `securityDefinitions` and per-operation `security` entries
pub trait SecurityDefinitionsGenerator {
    /// Document-level security definitions
    fn generate(&self) -> Result<IndexMap<String, Value>>;

    /// Security requirements of a single route; empty for public routes
    fn generate_for_route(&self, route: &Route) -> Vec<IndexMap<String, Vec<String>>>;
}

/// Create the generator for a configured security type
pub fn create_generator(
    security_type: &str,
    auth_flow: &str,
    host: &str,
) -> Result<Box<dyn SecurityDefinitionsGenerator>> {
    match security_type {
        "oauth2" => Ok(Box::new(OAuthSecurityDefinitionsGenerator::new(auth_flow, host))),
        "jwt" => Ok(Box::new(JwtSecurityDefinitionsGenerator)),
        other => Err(Error::UnsupportedSecurityType(other.to_string())),
    }
}

/// Bearer token passed in the `Authorization` header
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtSecurityDefinitionsGenerator;

impl SecurityDefinitionsGenerator for JwtSecurityDefinitionsGenerator {
    fn generate(&self) -> Result<IndexMap<String, Value>> {
        let mut definitions = IndexMap::new();
        definitions.insert(
            "Bearer".to_string(),
            json!({
                "type": "apiKey",
                "name": "Authorization",
                "in": "header",
            }),
        );
        Ok(definitions)
    }

    fn generate_for_route(&self, route: &Route) -> Vec<IndexMap<String, Vec<String>>> {
        if !route.has_auth_middleware() {
            return Vec::new();
        }

        let mut requirement = IndexMap::new();
        requirement.insert("Bearer".to_string(), Vec::new());
        vec![requirement]
    }
}

/// OAuth2 with endpoints served under `<host>/oauth`
#[derive(Debug, Clone)]
pub struct OAuthSecurityDefinitionsGenerator {
    flow: String,
    host: String,
}

impl OAuthSecurityDefinitionsGenerator {
    pub fn new(flow: &str, host: &str) -> Self {
        Self {
            flow: flow.to_string(),
            host: host.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/oauth/{}", self.host, path)
    }
}

impl SecurityDefinitionsGenerator for OAuthSecurityDefinitionsGenerator {
    fn generate(&self) -> Result<IndexMap<String, Value>> {
        let mut definition = json!({
            "type": "oauth2",
            "flow": self.flow,
        });

        match self.flow.as_str() {
            "password" | "application" => {
                definition["tokenUrl"] = json!(self.endpoint("token"));
            }
            "implicit" => {
                definition["authorizationUrl"] = json!(self.endpoint("authorize"));
            }
            "accessCode" => {
                definition["authorizationUrl"] = json!(self.endpoint("authorize"));
                definition["tokenUrl"] = json!(self.endpoint("token"));
            }
            other => return Err(Error::UnsupportedAuthFlow(other.to_string())),
        }
        definition["scopes"] = json!({});

        let mut definitions = IndexMap::new();
        definitions.insert("OAuth2".to_string(), definition);
        Ok(definitions)
    }

    fn generate_for_route(&self, route: &Route) -> Vec<IndexMap<String, Vec<String>>> {
        if !route.has_auth_middleware() {
            return Vec::new();
        }

        let scopes = route
            .middleware
            .iter()
            .filter_map(|middleware| {
                middleware
                    .strip_prefix("scopes:")
                    .or_else(|| middleware.strip_prefix("scope:"))
            })
            .flat_map(|scopes| scopes.split(','))
            .map(|scope| scope.trim().to_string())
            .filter(|scope| !scope.is_empty())
            .collect();

        let mut requirement = IndexMap::new();
        requirement.insert("OAuth2".to_string(), scopes);
        vec![requirement]
    }
}
