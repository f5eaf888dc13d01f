use crate::schema::short_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A documented route.
///
/// The route is read-only input to definition generation: it names the model
/// it operates on, the exceptions its action may raise, the request-validation
/// type bound to its parameters, and its middleware stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    /// The URI pattern (e.g. "/api/users/{user}")
    pub uri: String,
    /// Route name, if the route is named
    pub name: Option<String>,
    /// HTTP methods the route responds to
    pub methods: Vec<HttpMethod>,
    /// Name of the bound model
    pub model: Option<String>,
    /// Exception types the action declares, in declaration order
    pub exceptions: Vec<String>,
    /// Request-validation type bound to the action's parameters
    pub form_request: Option<FormRequest>,
    /// Middleware names
    pub middleware: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// A request-validation type and its rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormRequest {
    /// Fully qualified type name
    pub name: String,
    /// Field -> validation rules
    #[serde(default)]
    pub rules: IndexMap<String, RuleSet>,
}

/// Validation rules for a single field, either `"required|integer"` or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSet {
    Piped(String),
    List(Vec<String>),
}

impl RuleSet {
    pub fn rules(&self) -> Vec<&str> {
        match self {
            RuleSet::Piped(rules) => rules
                .split('|')
                .map(str::trim)
                .filter(|rule| !rule.is_empty())
                .collect(),
            RuleSet::List(rules) => rules.iter().map(String::as_str).collect(),
        }
    }
}

impl FormRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: IndexMap::new(),
        }
    }

    pub fn with_rule(mut self, field: &str, rules: &str) -> Self {
        self.rules
            .insert(field.to_string(), RuleSet::Piped(rules.to_string()));
        self
    }

    /// Type name without its namespace
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }
}

impl Route {
    /// Create a new Route with minimal required fields
    pub fn new(uri: &str, methods: Vec<HttpMethod>) -> Self {
        Self {
            uri: uri.to_string(),
            methods,
            ..Self::default()
        }
    }

    /// Methods the action really handles. HEAD is attached implicitly to GET
    /// routes and is left out.
    pub fn action_methods(&self) -> Vec<HttpMethod> {
        self.methods
            .iter()
            .copied()
            .filter(|method| *method != HttpMethod::Head)
            .collect()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }

    pub fn form_request(&self) -> Option<&FormRequest> {
        self.form_request.as_ref()
    }

    pub fn has_auth_middleware(&self) -> bool {
        self.middleware
            .iter()
            .any(|middleware| middleware == "auth" || middleware.starts_with("auth:"))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_exception(mut self, exception: &str) -> Self {
        self.exceptions.push(exception.to_string());
        self
    }

    pub fn with_form_request(mut self, form_request: FormRequest) -> Self {
        self.form_request = Some(form_request);
        self
    }

    pub fn with_middleware(mut self, middleware: &str) -> Self {
        self.middleware.push(middleware.to_string());
        self
    }
}
