use super::errors::{ErrorDefinition, ErrorSchemaMerger, HandlerRegistry};
use super::example::ExampleSampler;
use super::relation_walker::RelationWalker;
use super::store::DefinitionStore;
use crate::error::Result;
use crate::model::{ModelDescriptor, ModelRegistry};
use crate::route::{HttpMethod, Route};
use crate::schema::Schema;
use indexmap::IndexMap;
use log::debug;

/// Methods whose routes get model definitions unless configured otherwise
pub const DEFAULT_DEFINITION_METHODS: [HttpMethod; 2] = [HttpMethod::Get, HttpMethod::Post];

/// Generates the definitions documenting one route
pub struct DefinitionGenerator<'a> {
    registry: &'a ModelRegistry,
    error_definitions: &'a IndexMap<String, ErrorDefinition>,
    handlers: &'a HandlerRegistry,
    sampler: Option<&'a dyn ExampleSampler>,
    expand_relations: bool,
    definition_methods: Vec<HttpMethod>,
}

impl<'a> DefinitionGenerator<'a> {
    pub fn new(
        registry: &'a ModelRegistry,
        error_definitions: &'a IndexMap<String, ErrorDefinition>,
        handlers: &'a HandlerRegistry,
    ) -> Self {
        Self {
            registry,
            error_definitions,
            handlers,
            sampler: None,
            expand_relations: false,
            definition_methods: DEFAULT_DEFINITION_METHODS.to_vec(),
        }
    }

    /// Sample example values for model properties
    pub fn with_examples(mut self, sampler: &'a dyn ExampleSampler) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Follow model relations into nested definitions
    pub fn with_relations(mut self, expand_relations: bool) -> Self {
        self.expand_relations = expand_relations;
        self
    }

    /// Only routes whose methods all appear here get model definitions
    pub fn with_definition_methods(mut self, methods: Vec<HttpMethod>) -> Self {
        self.definition_methods = methods;
        self
    }

    /// Definitions for the route, most recently defined first.
    ///
    /// Model definitions are generated when the route passes the method gate
    /// and has a bound model; error definitions are always generated.
    pub fn generate(&self, route: &Route) -> Result<IndexMap<String, Schema>> {
        let mut store = DefinitionStore::new();

        if let Some(model) = self.root_model(route)? {
            let mut walker = RelationWalker::new(self.registry);
            if let Some(sampler) = self.sampler {
                walker = walker.with_examples(sampler);
            }

            if walker.define_model(model, &mut store)? && self.expand_relations {
                walker.expand_relations(model, &mut store)?;
            }
        }

        let merger = ErrorSchemaMerger::new(self.error_definitions, self.handlers);
        store.merge(merger.merge(route)?);

        Ok(store.into_reversed())
    }

    /// The model the route's definitions are rooted at, if the route gets
    /// model definitions at all
    pub fn root_model(&self, route: &Route) -> Result<Option<&'a ModelDescriptor>> {
        if !self.allows_definitions(route) {
            debug!("Skipping model definitions for {}: method not allowed", route.uri);
            return Ok(None);
        }

        match route.model() {
            Some(name) => self.registry.get(name).map(Some),
            None => Ok(None),
        }
    }

    fn allows_definitions(&self, route: &Route) -> bool {
        route
            .action_methods()
            .iter()
            .all(|method| self.definition_methods.contains(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::errors::default_error_definitions;
    use crate::model::RelationKind;
    use crate::route::FormRequest;
    use pretty_assertions::assert_eq;

    fn registry() -> ModelRegistry {
        ModelRegistry::new(vec![
            ModelDescriptor::new("App\\Models\\Author")
                .with_columns(&["id", "name", "rating", "verified", "api_token", "born_at"])
                .with_hidden(&["api_token"])
                .with_cast("id", "int")
                .with_cast("rating", "float")
                .with_cast("verified", "boolean")
                .with_cast("born_at", "int")
                .with_dates(&["born_at"])
                .with_relation("books", RelationKind::HasMany, "App\\Models\\Book"),
            ModelDescriptor::new("App\\Models\\Book")
                .with_columns(&["id", "title"])
                .with_relation("author", RelationKind::BelongsTo, "App\\Models\\Author"),
            ModelDescriptor::new("App\\Models\\Note").with_columns(&["id", "body"]),
        ])
    }

    fn route(methods: Vec<HttpMethod>, model: &str) -> Route {
        Route::new("/api/things", methods).with_model(model)
    }

    #[test]
    fn test_model_without_relations_yields_single_definition() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers).with_relations(true);

        let definitions = generator
            .generate(&route(vec![HttpMethod::Get], "Note"))
            .unwrap();

        let mut properties = IndexMap::new();
        properties.insert("id".to_string(), Schema::string());
        properties.insert("body".to_string(), Schema::string());

        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions["Note"], Schema::object(properties));
    }

    #[test]
    fn test_column_types_and_hidden_columns() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers);

        let definitions = generator
            .generate(&route(vec![HttpMethod::Get], "Author"))
            .unwrap();

        let properties = definitions["Author"].properties.as_ref().unwrap();
        let names: Vec<_> = properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "name", "rating", "verified", "born_at"]);
        assert_eq!(properties["id"], Schema::typed("integer"));
        assert_eq!(properties["rating"], Schema::typed("number").with_format("float"));
        assert_eq!(properties["verified"], Schema::typed("boolean"));
        assert_eq!(properties["born_at"], Schema::string().with_format("date-time"));
    }

    #[test]
    fn test_relations_only_expanded_when_enabled() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();

        let flat = DefinitionGenerator::new(&registry, &errors, &handlers)
            .generate(&route(vec![HttpMethod::Get], "Author"))
            .unwrap();
        assert_eq!(flat.len(), 1);
        assert!(!flat["Author"].properties.as_ref().unwrap().contains_key("books"));

        let expanded = DefinitionGenerator::new(&registry, &errors, &handlers)
            .with_relations(true)
            .generate(&route(vec![HttpMethod::Get], "Author"))
            .unwrap();
        let names: Vec<_> = expanded.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Book", "Author"]);
    }

    #[test]
    fn test_cyclic_relations_terminate_with_mutual_refs() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers).with_relations(true);

        let definitions = generator
            .generate(&route(vec![HttpMethod::Get], "Author"))
            .unwrap();

        assert_eq!(definitions.len(), 2);
        let author = definitions["Author"].properties.as_ref().unwrap();
        assert_eq!(author["books"], Schema::array(Schema::reference("Book")));
        let book = definitions["Book"].properties.as_ref().unwrap();
        assert_eq!(book["author"], Schema::reference("Author"));
    }

    #[test]
    fn test_put_route_yields_only_error_definitions() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers).with_relations(true);

        let route = route(vec![HttpMethod::Put], "Author").with_exception("ModelNotFoundException");
        let definitions = generator.generate(&route).unwrap();

        let names: Vec<_> = definitions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["NotFoundError"]);
    }

    #[test]
    fn test_mixed_methods_fail_the_gate() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers);

        let definitions = generator
            .generate(&route(vec![HttpMethod::Get, HttpMethod::Delete], "Note"))
            .unwrap();
        assert!(definitions.is_empty());

        let with_head = generator
            .generate(&route(vec![HttpMethod::Get, HttpMethod::Head], "Note"))
            .unwrap();
        assert!(with_head.contains_key("Note"));
    }

    #[test]
    fn test_definition_methods_are_configurable() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers)
            .with_definition_methods(vec![HttpMethod::Get, HttpMethod::Put]);

        let definitions = generator
            .generate(&route(vec![HttpMethod::Put], "Note"))
            .unwrap();
        assert!(definitions.contains_key("Note"));
    }

    #[test]
    fn test_route_without_model_still_gets_errors() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers);

        let route = Route::new("/api/login", vec![HttpMethod::Post])
            .with_exception("ValidationException")
            .with_form_request(FormRequest::new("App\\Http\\Requests\\CreateUserRequest"));
        let definitions = generator.generate(&route).unwrap();

        let names: Vec<_> = definitions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["CreateUserRequest"]);
    }

    #[test]
    fn test_errors_come_first_in_output() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers).with_relations(true);

        let route = route(vec![HttpMethod::Get], "Author")
            .with_exception("AuthenticationException")
            .with_exception("ModelNotFoundException");
        let definitions = generator.generate(&route).unwrap();

        let names: Vec<_> = definitions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["NotFoundError", "UnauthenticatedError", "Book", "Author"]);
    }

    #[test]
    fn test_unknown_bound_model_propagates() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers);

        assert!(generator
            .generate(&route(vec![HttpMethod::Get], "Ghost"))
            .is_err());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let registry = registry();
        let errors = default_error_definitions();
        let handlers = HandlerRegistry::default();
        let generator = DefinitionGenerator::new(&registry, &errors, &handlers).with_relations(true);

        let route = route(vec![HttpMethod::Get], "Author").with_exception("ModelNotFoundException");
        let first = serde_json::to_string(&generator.generate(&route).unwrap()).unwrap();
        let second = serde_json::to_string(&generator.generate(&route).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
