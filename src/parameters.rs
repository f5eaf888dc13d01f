//! Operation parameters derived from the route URI and its form request rules.

use crate::route::RuleSet;
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Swagger 2.0 parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter location (path, query, body)
    #[serde(rename = "in")]
    pub location: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Schema>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Body parameters carry a schema instead of a type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Parameter {
    fn simple(location: &str, name: &str, required: bool, schema: Schema) -> Self {
        Self {
            location: location.to_string(),
            name: name.to_string(),
            description: None,
            required,
            param_type: schema.schema_type,
            format: schema.format,
            items: schema.items.map(|items| *items),
            enum_values: schema.enum_values,
            schema: None,
        }
    }
}

/// Source of the parameters found at one location
pub trait ParameterGenerator {
    fn parameters(&self) -> Vec<Parameter>;
    fn location(&self) -> &'static str;
}

/// `{name}` segments of a URI; `{name?}` marks an optional segment
pub struct PathParameterGenerator<'a> {
    uri: &'a str,
}

impl<'a> PathParameterGenerator<'a> {
    pub fn new(uri: &'a str) -> Self {
        Self { uri }
    }
}

impl ParameterGenerator for PathParameterGenerator<'_> {
    fn parameters(&self) -> Vec<Parameter> {
        self.uri
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .map(|name| match name.strip_suffix('?') {
                Some(name) => Parameter::simple(self.location(), name, false, Schema::string()),
                None => Parameter::simple(self.location(), name, true, Schema::string()),
            })
            .collect()
    }

    fn location(&self) -> &'static str {
        "path"
    }
}

/// One query parameter per validated field
pub struct QueryParameterGenerator<'a> {
    rules: &'a IndexMap<String, RuleSet>,
}

impl<'a> QueryParameterGenerator<'a> {
    pub fn new(rules: &'a IndexMap<String, RuleSet>) -> Self {
        Self { rules }
    }
}

impl ParameterGenerator for QueryParameterGenerator<'_> {
    fn parameters(&self) -> Vec<Parameter> {
        top_level_fields(self.rules)
            .map(|(field, rules)| {
                Parameter::simple(self.location(), field, is_required(&rules), rule_schema(&rules))
            })
            .collect()
    }

    fn location(&self) -> &'static str {
        "query"
    }
}

/// A single `body` parameter whose schema lists the validated fields
pub struct BodyParameterGenerator<'a> {
    rules: &'a IndexMap<String, RuleSet>,
}

impl<'a> BodyParameterGenerator<'a> {
    pub fn new(rules: &'a IndexMap<String, RuleSet>) -> Self {
        Self { rules }
    }
}

impl ParameterGenerator for BodyParameterGenerator<'_> {
    fn parameters(&self) -> Vec<Parameter> {
        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for (field, rules) in top_level_fields(self.rules) {
            if is_required(&rules) {
                required.push(field.to_string());
            }
            properties.insert(field.to_string(), rule_schema(&rules));
        }

        let mut schema = Schema::object(properties);
        if !required.is_empty() {
            schema.required = Some(required);
        }

        vec![Parameter {
            location: self.location().to_string(),
            name: "body".to_string(),
            description: None,
            required: true,
            param_type: None,
            format: None,
            items: None,
            enum_values: None,
            schema: Some(schema),
        }]
    }

    fn location(&self) -> &'static str {
        "body"
    }
}

// Nested fields (`items.*`, `address.city`) are not documented
fn top_level_fields(
    rules: &IndexMap<String, RuleSet>,
) -> impl Iterator<Item = (&str, Vec<&str>)> {
    rules
        .iter()
        .filter(|(field, _)| !field.contains('.'))
        .map(|(field, rules)| (field.as_str(), rules.rules()))
}

fn is_required(rules: &[&str]) -> bool {
    rules.contains(&"required")
}

fn rule_schema(rules: &[&str]) -> Schema {
    let mut schema = if rules.contains(&"integer") {
        Schema::typed("integer")
    } else if rules.contains(&"numeric") {
        Schema::typed("number")
    } else if rules.contains(&"boolean") {
        Schema::typed("boolean")
    } else if rules.contains(&"array") {
        Schema::array(Schema::string())
    } else if rules.contains(&"date") {
        Schema::string().with_format("date-time")
    } else {
        Schema::string()
    };

    if let Some(values) = rules.iter().find_map(|rule| rule.strip_prefix("in:")) {
        schema.enum_values = Some(values.split(',').map(|v| v.trim().to_string()).collect());
    }

    schema
}
