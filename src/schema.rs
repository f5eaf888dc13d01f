use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix used by every `$ref` pointing into the document's definitions section
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// Swagger 2.0 schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Reference to another definition
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g., "float", "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Properties for object types, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Sampled example value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Schema {
    /// A schema with only `type` set
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    /// A plain `{type: string}` schema
    pub fn string() -> Self {
        Self::typed("string")
    }

    /// An object schema with the given properties (possibly empty)
    pub fn object(properties: IndexMap<String, Schema>) -> Self {
        Self {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            ..Self::default()
        }
    }

    /// An array schema wrapping `items`
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// A `$ref` to the named definition
    pub fn reference(definition: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_REF_PREFIX, definition)),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
}

/// Strips a namespace from a type name: `App\Models\User` and `app::models::User`
/// both become `User`.
pub fn short_name(name: &str) -> &str {
    let after_backslash = name.rsplit('\\').next().unwrap_or(name);
    after_backslash.rsplit("::").next().unwrap_or(after_backslash)
}
