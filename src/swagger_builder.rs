use crate::config::VersionConfig;
use crate::definitions::errors::ResolvedError;
use crate::definitions::example::{FactorySampler, NoopConnection};
use crate::definitions::{DefinitionGenerator, ErrorSchemaMerger, HandlerRegistry};
use crate::error::Result;
use crate::manifest::Application;
use crate::parameters::{
    BodyParameterGenerator, Parameter, ParameterGenerator, PathParameterGenerator,
    QueryParameterGenerator,
};
use crate::route::{HttpMethod, Route};
use crate::schema::Schema;
use crate::security::{create_generator, SecurityDefinitionsGenerator};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Swagger 2.0 document builder for one API version
pub struct SwaggerBuilder<'a> {
    config: &'a VersionConfig,
    application: &'a Application,
    handlers: HandlerRegistry,
    filter: Option<String>,
}

/// Swagger Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version
    pub version: String,
}

/// Swagger PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

/// Swagger Operation object - represents a single API operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation ID (the route name)
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Responses keyed by HTTP status
    pub responses: IndexMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
}

/// Swagger Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Swagger version
    pub swagger: String,
    pub info: Info,
    pub host: String,
    #[serde(rename = "basePath")]
    pub base_path: String,
    pub schemes: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub paths: IndexMap<String, PathItem>,
    pub definitions: IndexMap<String, Schema>,
    #[serde(rename = "securityDefinitions", skip_serializing_if = "Option::is_none")]
    pub security_definitions: Option<IndexMap<String, Value>>,
}

impl<'a> SwaggerBuilder<'a> {
    pub fn new(config: &'a VersionConfig, application: &'a Application) -> Self {
        debug!("Initializing SwaggerBuilder for version {}", config.app_version);
        Self {
            config,
            application,
            handlers: HandlerRegistry::default(),
            filter: None,
        }
    }

    /// Only document routes whose URI starts with `prefix`
    pub fn with_filter(mut self, prefix: Option<String>) -> Self {
        self.filter = prefix;
        self
    }

    /// Use a custom set of error definition handlers
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Build the document
    pub fn build(&self) -> Result<SwaggerDocument> {
        let config = self.config;

        let security = if config.parse_security {
            Some(create_generator(
                &config.security_definition_type,
                &config.authentication_flow,
                &config.host,
            )?)
        } else {
            None
        };

        let mut document = SwaggerDocument {
            swagger: "2.0".to_string(),
            info: Info {
                title: config.title.clone(),
                description: if config.description.is_empty() {
                    None
                } else {
                    Some(config.description.clone())
                },
                version: config.app_version.clone(),
            },
            host: config.host.clone(),
            base_path: config.base_path.clone(),
            schemes: config.schemes.clone(),
            consumes: config.consumes.clone(),
            produces: config.produces.clone(),
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
            security_definitions: match &security {
                Some(generator) => Some(generator.generate()?),
                None => None,
            },
        };

        let sampler = FactorySampler::new(&self.application.factory, NoopConnection);
        let mut generator = DefinitionGenerator::new(
            &self.application.registry,
            &config.errors_definitions,
            &self.handlers,
        )
        .with_relations(config.parse_model_relationships)
        .with_definition_methods(config.definition_methods.clone());
        if config.generate_example_data {
            generator = generator.with_examples(&sampler);
        }
        let merger = ErrorSchemaMerger::new(&config.errors_definitions, &self.handlers);

        let routes: Vec<&Route> = self
            .application
            .routes
            .iter()
            .filter(|route| self.is_documented(route))
            .collect();
        info!("Documenting {} routes for version {}", routes.len(), config.app_version);

        for route in routes {
            for (name, schema) in generator.generate(route)? {
                document.definitions.entry(name).or_insert(schema);
            }

            let model_definition = generator
                .root_model(route)?
                .map(|model| model.definition_name().to_string());
            let errors = merger.resolve(route);

            self.add_route(
                &mut document,
                route,
                model_definition.as_deref(),
                &errors,
                security.as_deref(),
            );
        }

        Ok(document)
    }

    fn add_route(
        &self,
        document: &mut SwaggerDocument,
        route: &Route,
        model_definition: Option<&str>,
        errors: &[ResolvedError],
        security: Option<&dyn SecurityDefinitionsGenerator>,
    ) {
        let path = Self::convert_path_format(&route.uri);

        for method in route.action_methods() {
            if self.config.ignored_methods.contains(&method) {
                continue;
            }
            debug!("Adding operation: {} {}", method.as_str(), path);

            let operation = Operation {
                summary: route.summary.clone(),
                description: route.description.clone(),
                operation_id: route.name.clone(),
                parameters: Self::parameters(route, method),
                responses: Self::responses(model_definition, errors),
                security: security
                    .map(|generator| generator.generate_for_route(route))
                    .filter(|requirements| !requirements.is_empty()),
            };

            let path_item = document.paths.entry(path.clone()).or_default();
            match method {
                HttpMethod::Get => path_item.get = Some(operation),
                HttpMethod::Post => path_item.post = Some(operation),
                HttpMethod::Put => path_item.put = Some(operation),
                HttpMethod::Delete => path_item.delete = Some(operation),
                HttpMethod::Patch => path_item.patch = Some(operation),
                HttpMethod::Options => path_item.options = Some(operation),
                HttpMethod::Head => path_item.head = Some(operation),
            }
        }
    }

    fn parameters(route: &Route, method: HttpMethod) -> Vec<Parameter> {
        let mut parameters = PathParameterGenerator::new(&route.uri).parameters();

        if let Some(request) = route.form_request() {
            match method {
                HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                    parameters.extend(BodyParameterGenerator::new(&request.rules).parameters())
                }
                _ => parameters.extend(QueryParameterGenerator::new(&request.rules).parameters()),
            }
        }

        parameters
    }

    fn responses(
        model_definition: Option<&str>,
        errors: &[ResolvedError],
    ) -> IndexMap<String, Response> {
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "OK".to_string(),
                schema: model_definition.map(Schema::reference),
            },
        );

        for error in errors {
            responses
                .entry(error.http_code.to_string())
                .or_insert_with(|| Response {
                    description: status_text(error.http_code).to_string(),
                    schema: Some(Schema::reference(&error.reference)),
                });
        }

        responses
    }

    fn is_documented(&self, route: &Route) -> bool {
        let uri = route.uri.trim_start_matches('/');

        if let Some(filter) = &self.filter {
            if !uri.starts_with(filter.trim_start_matches('/')) {
                return false;
            }
        }

        if !uri.starts_with(self.config.api_base_path.trim_start_matches('/')) {
            return false;
        }

        !self.config.ignored_routes.iter().any(|ignored| {
            ignored.trim_start_matches('/') == uri || route.name.as_deref() == Some(ignored.as_str())
        })
    }

    /// Normalize a route URI into a Swagger path: leading slash, and
    /// optional segments `{id?}` written as `{id}`
    fn convert_path_format(uri: &str) -> String {
        let parts: Vec<String> = uri
            .trim_start_matches('/')
            .split('/')
            .map(|part| {
                if part.starts_with('{') && part.ends_with("?}") {
                    format!("{}}}", &part[..part.len() - 2])
                } else {
                    part.to_string()
                }
            })
            .collect();

        format!("/{}", parts.join("/"))
    }
}

fn status_text(http_code: u16) -> &'static str {
    match http_code {
        400 => "Bad Request",
        401 => "Unauthenticated",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::errors::{DefinitionHandler, ErrorDefinition};
    use crate::definitions::example::{FixtureFactory, Record};
    use crate::model::{ModelDescriptor, ModelRegistry, RelationKind};
    use crate::route::FormRequest;
    use serde_json::json;

    fn application(routes: Vec<Route>) -> Application {
        let registry = ModelRegistry::new(vec![
            ModelDescriptor::new("App\\Models\\User")
                .with_columns(&["id", "name", "password"])
                .with_hidden(&["password"])
                .with_cast("id", "int")
                .with_relation("posts", RelationKind::HasMany, "App\\Models\\Post"),
            ModelDescriptor::new("App\\Models\\Post")
                .with_columns(&["id", "title"])
                .with_relation("author", RelationKind::BelongsTo, "App\\Models\\User"),
        ]);

        let mut record = Record::new();
        record.insert("name".to_string(), json!("Ada"));
        let mut records = IndexMap::new();
        records.insert("User".to_string(), record);

        Application {
            registry,
            routes,
            factory: FixtureFactory::new(records),
        }
    }

    fn user_routes() -> Vec<Route> {
        vec![
            Route::new("/api/users/{user}", vec![HttpMethod::Get, HttpMethod::Head])
                .with_model("User")
                .with_exception("ModelNotFoundException"),
            Route::new("/api/users", vec![HttpMethod::Post])
                .with_model("User")
                .with_exception("ValidationException")
                .with_form_request(
                    FormRequest::new("App\\Http\\Requests\\CreateUserRequest")
                        .with_rule("name", "required|string"),
                )
                .with_middleware("auth:api"),
            Route::new("/api/users/{user}", vec![HttpMethod::Delete])
                .with_model("User")
                .with_exception("ModelNotFoundException"),
            Route::new("/health", vec![HttpMethod::Get]),
        ]
    }

    #[test]
    fn test_document_header() {
        let config = VersionConfig::default();
        let application = application(Vec::new());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        assert_eq!(document.swagger, "2.0");
        assert_eq!(document.info.version, "1.0.0");
        assert!(document.info.description.is_none());
        assert!(document.paths.is_empty());
        assert!(document.definitions.is_empty());
        assert!(document.security_definitions.is_none());
    }

    #[test]
    fn test_operations_per_method() {
        let config = VersionConfig::default();
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        let item = &document.paths["/api/users/{user}"];
        assert!(item.get.is_some());
        assert!(item.delete.is_some());
        assert!(item.head.is_none());
        assert!(document.paths["/api/users"].post.is_some());
    }

    #[test]
    fn test_responses_reference_definitions() {
        let config = VersionConfig::default();
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        let show = document.paths["/api/users/{user}"].get.as_ref().unwrap();
        assert_eq!(show.responses["200"].schema, Some(Schema::reference("User")));
        assert_eq!(show.responses["404"].schema, Some(Schema::reference("NotFoundError")));
        assert_eq!(show.responses["404"].description, "Not Found");

        let store = document.paths["/api/users"].post.as_ref().unwrap();
        assert_eq!(
            store.responses["422"].schema,
            Some(Schema::reference("CreateUserRequest"))
        );

        // DELETE is gated out of model definitions
        let destroy = document.paths["/api/users/{user}"].delete.as_ref().unwrap();
        assert!(destroy.responses["200"].schema.is_none());
    }

    #[test]
    fn test_definitions_merged_across_routes() {
        let mut config = VersionConfig::default();
        config.parse_model_relationships = true;
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        let names: Vec<_> = document.definitions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["NotFoundError", "Post", "User", "CreateUserRequest"]);
    }

    #[test]
    fn test_parameters_by_method() {
        let config = VersionConfig::default();
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        let show = document.paths["/api/users/{user}"].get.as_ref().unwrap();
        assert_eq!(show.parameters.len(), 1);
        assert_eq!(show.parameters[0].location, "path");

        let store = document.paths["/api/users"].post.as_ref().unwrap();
        assert_eq!(store.parameters.len(), 1);
        assert_eq!(store.parameters[0].location, "body");
    }

    #[test]
    fn test_security_only_on_protected_routes() {
        let mut config = VersionConfig::default();
        config.parse_security = true;
        config.security_definition_type = "jwt".to_string();
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        assert!(document.security_definitions.unwrap().contains_key("Bearer"));
        assert!(document.paths["/api/users"].post.as_ref().unwrap().security.is_some());
        assert!(document.paths["/health"].get.as_ref().unwrap().security.is_none());
    }

    #[test]
    fn test_unsupported_security_type_fails_build() {
        let mut config = VersionConfig::default();
        config.parse_security = true;
        config.security_definition_type = "saml".to_string();
        let application = application(Vec::new());

        assert!(SwaggerBuilder::new(&config, &application).build().is_err());
    }

    #[test]
    fn test_examples_from_factory() {
        let mut config = VersionConfig::default();
        config.generate_example_data = true;
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application).build().unwrap();

        let user = document.definitions["User"].properties.as_ref().unwrap();
        assert_eq!(user["name"].example.as_deref(), Some("Ada"));
        assert!(user["id"].example.is_none());
    }

    #[test]
    fn test_route_filters() {
        let mut config = VersionConfig::default();
        config.api_base_path = "/api".to_string();
        config.ignored_routes = vec!["api/users".to_string()];
        let application = application(user_routes());
        let document = SwaggerBuilder::new(&config, &application)
            .with_filter(Some("/api/users/".to_string()))
            .build()
            .unwrap();

        let paths: Vec<_> = document.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/api/users/{user}"]);
    }

    struct RateLimitHandler {
        reference: String,
    }

    impl DefinitionHandler for RateLimitHandler {
        fn handle(&self) -> IndexMap<String, Schema> {
            let mut properties = IndexMap::new();
            properties.insert("message".to_string(), Schema::string());
            properties.insert("retry_after".to_string(), Schema::typed("integer"));

            let mut definitions = IndexMap::new();
            definitions.insert(self.reference.clone(), Schema::object(properties));
            definitions
        }
    }

    fn rate_limit_handler(_route: &Route, reference: String) -> Box<dyn DefinitionHandler> {
        Box::new(RateLimitHandler { reference })
    }

    #[test]
    fn test_custom_handler_reaches_document() {
        let mut config = VersionConfig::default();
        config.errors_definitions.insert(
            "TooManyRequestsError".to_string(),
            ErrorDefinition::new("ThrottleRequestsException", 429, "rate_limit"),
        );
        let application = application(vec![Route::new("/api/search", vec![HttpMethod::Get])
            .with_exception("ThrottleRequestsException")]);

        let mut handlers = HandlerRegistry::default();
        handlers.register("rate_limit", rate_limit_handler);
        let document = SwaggerBuilder::new(&config, &application)
            .with_handlers(handlers)
            .build()
            .unwrap();

        let properties = document.definitions["TooManyRequestsError"]
            .properties
            .as_ref()
            .unwrap();
        assert_eq!(
            properties["retry_after"].schema_type.as_deref(),
            Some("integer")
        );

        let search = document.paths["/api/search"].get.as_ref().unwrap();
        assert_eq!(search.responses["429"].description, "Too Many Requests");
        assert_eq!(
            search.responses["429"].schema,
            Some(Schema::reference("TooManyRequestsError"))
        );
    }

    #[test]
    fn test_unregistered_handler_fails_build() {
        let mut config = VersionConfig::default();
        config.errors_definitions.insert(
            "TooManyRequestsError".to_string(),
            ErrorDefinition::new("ThrottleRequestsException", 429, "rate_limit"),
        );
        let application = application(vec![Route::new("/api/search", vec![HttpMethod::Get])
            .with_exception("ThrottleRequestsException")]);

        assert!(SwaggerBuilder::new(&config, &application).build().is_err());
    }

    #[test]
    fn test_convert_path_format() {
        assert_eq!(
            SwaggerBuilder::convert_path_format("api/posts/{post}/comments/{comment?}"),
            "/api/posts/{post}/comments/{comment}"
        );
        assert_eq!(SwaggerBuilder::convert_path_format("/health"), "/health");
    }
}
