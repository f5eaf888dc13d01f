//! Per-version generator configuration.
//!
//! Every field has a default, so a manifest only needs to spell out what it
//! changes:
//!
//! ```yaml
//! versions:
//!   - app_version: "1.0.0"
//!     host: https://api.example.com
//!     api_base_path: /api/v1
//!     parse_model_relationships: true
//!     parse_security: true
//!     security_definition_type: oauth2
//!     authentication_flow: password
//! ```

use crate::definitions::errors::default_error_definitions;
use crate::definitions::generator::DEFAULT_DEFINITION_METHODS;
use crate::definitions::ErrorDefinition;
use crate::route::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration of one documented API version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    pub app_version: String,
    pub title: String,
    pub description: String,
    pub host: String,
    pub base_path: String,
    /// Only routes whose URI starts with this prefix belong to the version
    pub api_base_path: String,
    pub schemes: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub ignored_methods: Vec<HttpMethod>,
    /// Route URIs or names left out of the document
    pub ignored_routes: Vec<String>,
    pub generate_example_data: bool,
    pub parse_model_relationships: bool,
    pub parse_security: bool,
    /// `jwt` or `oauth2`
    pub security_definition_type: String,
    /// OAuth2 flow: `password`, `application`, `implicit` or `accessCode`
    pub authentication_flow: String,
    /// Routes get model definitions only when all their methods are listed here
    pub definition_methods: Vec<HttpMethod>,
    pub errors_definitions: IndexMap<String, ErrorDefinition>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            app_version: "1.0.0".to_string(),
            title: "API Documentation".to_string(),
            description: String::new(),
            host: "http://localhost".to_string(),
            base_path: "/".to_string(),
            api_base_path: String::new(),
            schemes: vec!["http".to_string(), "https".to_string()],
            consumes: vec!["application/json".to_string()],
            produces: vec!["application/json".to_string()],
            ignored_methods: vec![HttpMethod::Head, HttpMethod::Options],
            ignored_routes: Vec::new(),
            generate_example_data: false,
            parse_model_relationships: false,
            parse_security: false,
            security_definition_type: "oauth2".to_string(),
            authentication_flow: "password".to_string(),
            definition_methods: DEFAULT_DEFINITION_METHODS.to_vec(),
            errors_definitions: default_error_definitions(),
        }
    }
}
