//! Error-response definitions.
//!
//! Error definitions are registered per reference key: which exception type
//! they document, which HTTP status it maps to, and which handler builds the
//! schema. Handlers are looked up by name in a [`HandlerRegistry`] of
//! constructor functions.

use crate::error::{Error, Result};
use crate::route::Route;
use crate::schema::Schema;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP status of validation failures
pub const VALIDATION_HTTP_CODE: u16 = 422;

pub const DEFAULT_HANDLER: &str = "default";
pub const VALIDATION_HANDLER: &str = "validation";

/// Registration of one documented exception type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDefinition {
    /// Exception type name, matched exactly against the route's exceptions
    pub exception: String,
    pub http_code: u16,
    /// Name of the handler in the [`HandlerRegistry`]
    #[serde(default = "default_handler_name")]
    pub handler: String,
}

fn default_handler_name() -> String {
    DEFAULT_HANDLER.to_string()
}

impl ErrorDefinition {
    pub fn new(exception: &str, http_code: u16, handler: &str) -> Self {
        Self {
            exception: exception.to_string(),
            http_code,
            handler: handler.to_string(),
        }
    }
}

/// Error definitions documented when none are configured
pub fn default_error_definitions() -> IndexMap<String, ErrorDefinition> {
    let mut definitions = IndexMap::new();
    definitions.insert(
        "UnauthenticatedError".to_string(),
        ErrorDefinition::new("AuthenticationException", 401, DEFAULT_HANDLER),
    );
    definitions.insert(
        "ForbiddenError".to_string(),
        ErrorDefinition::new("AuthorizationException", 403, DEFAULT_HANDLER),
    );
    definitions.insert(
        "NotFoundError".to_string(),
        ErrorDefinition::new("ModelNotFoundException", 404, DEFAULT_HANDLER),
    );
    definitions.insert(
        "UnprocessableEntityError".to_string(),
        ErrorDefinition::new("ValidationException", VALIDATION_HTTP_CODE, VALIDATION_HANDLER),
    );
    definitions
}

/// Produces the definitions documenting one error response
pub trait DefinitionHandler {
    fn handle(&self) -> IndexMap<String, Schema>;
}

/// Constructor for a handler, given the route and the resolved reference key
pub type HandlerConstructor = fn(&Route, String) -> Box<dyn DefinitionHandler>;

/// `{message: string}` object
pub struct DefaultDefinitionHandler {
    reference: String,
}

impl DefaultDefinitionHandler {
    pub fn create(_route: &Route, reference: String) -> Box<dyn DefinitionHandler> {
        Box::new(Self { reference })
    }
}

impl DefinitionHandler for DefaultDefinitionHandler {
    fn handle(&self) -> IndexMap<String, Schema> {
        let mut properties = IndexMap::new();
        properties.insert("message".to_string(), Schema::string());

        let mut definitions = IndexMap::new();
        definitions.insert(self.reference.clone(), Schema::object(properties));
        definitions
    }
}

/// `{message, errors}` object where `errors` lists the messages of each
/// field validated by the route's form request
pub struct ValidationDefinitionHandler {
    reference: String,
    fields: Vec<String>,
}

impl ValidationDefinitionHandler {
    pub fn create(route: &Route, reference: String) -> Box<dyn DefinitionHandler> {
        let fields = match route.form_request() {
            Some(request) => request.rules.keys().cloned().collect(),
            None => {
                warn!("{} documents a validation error without a form request", route.uri);
                Vec::new()
            }
        };
        Box::new(Self { reference, fields })
    }
}

impl DefinitionHandler for ValidationDefinitionHandler {
    fn handle(&self) -> IndexMap<String, Schema> {
        let errors = self
            .fields
            .iter()
            .map(|field| (field.clone(), Schema::array(Schema::string())))
            .collect();

        let mut properties = IndexMap::new();
        properties.insert("message".to_string(), Schema::string());
        properties.insert("errors".to_string(), Schema::object(errors));

        let mut definitions = IndexMap::new();
        definitions.insert(self.reference.clone(), Schema::object(properties));
        definitions
    }
}

/// Named handler constructors
#[derive(Clone)]
pub struct HandlerRegistry {
    constructors: HashMap<String, HandlerConstructor>,
}

impl HandlerRegistry {
    pub fn register(&mut self, name: &str, constructor: HandlerConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    pub fn get(&self, name: &str) -> Option<HandlerConstructor> {
        self.constructors.get(name).copied()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register(DEFAULT_HANDLER, DefaultDefinitionHandler::create);
        registry.register(VALIDATION_HANDLER, ValidationDefinitionHandler::create);
        registry
    }
}

/// An error definition matched against a route
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedError {
    /// Name the error schema is defined under
    pub reference: String,
    pub http_code: u16,
    pub handler: String,
}

/// Matches a route's exceptions against the registered error definitions
pub struct ErrorSchemaMerger<'a> {
    definitions: &'a IndexMap<String, ErrorDefinition>,
    handlers: &'a HandlerRegistry,
}

impl<'a> ErrorSchemaMerger<'a> {
    pub fn new(
        definitions: &'a IndexMap<String, ErrorDefinition>,
        handlers: &'a HandlerRegistry,
    ) -> Self {
        Self {
            definitions,
            handlers,
        }
    }

    /// Error definitions matching the route's exceptions, in the order the
    /// route declares them. Undocumented exceptions are skipped.
    pub fn resolve(&self, route: &Route) -> Vec<ResolvedError> {
        let form_request = route.form_request();

        route
            .exceptions()
            .iter()
            .filter_map(|exception| {
                let (key, definition) = self
                    .definitions
                    .iter()
                    .find(|(_, definition)| definition.exception == *exception)?;

                // Validation errors are named after the request they validate
                let reference = match form_request {
                    Some(request) if definition.http_code == VALIDATION_HTTP_CODE => {
                        request.short_name().to_string()
                    }
                    _ => key.clone(),
                };

                Some(ResolvedError {
                    reference,
                    http_code: definition.http_code,
                    handler: definition.handler.clone(),
                })
            })
            .collect()
    }

    /// Build the error schemas for the route. A name produced twice keeps its
    /// first schema.
    pub fn merge(&self, route: &Route) -> Result<IndexMap<String, Schema>> {
        let mut merged = IndexMap::new();

        for resolved in self.resolve(route) {
            let constructor = self.handlers.get(&resolved.handler).ok_or_else(|| {
                Error::UnknownErrorHandler {
                    reference: resolved.reference.clone(),
                    handler: resolved.handler.clone(),
                }
            })?;

            debug!(
                "Documenting {} error as {} with '{}' handler",
                resolved.http_code, resolved.reference, resolved.handler
            );

            let handler = constructor(route, resolved.reference);
            for (name, schema) in handler.handle() {
                merged.entry(name).or_insert(schema);
            }
        }

        Ok(merged)
    }
}
