//! Statically declared model descriptors.
//!
//! A [`ModelDescriptor`] carries everything the definition generator needs to
//! know about a model: its storage columns, which of them are hidden from
//! serialization, declared casts, date columns, computed ("appended")
//! attributes and its relations. Relations refer to related models by name and
//! are resolved through a [`ModelRegistry`], which lets cyclic relation graphs
//! be described without shared ownership.

use crate::error::{Error, Result};
use crate::schema::short_name;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Description of a single model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Fully qualified model name (e.g. `App\Models\User`)
    pub name: String,
    /// Backing table name
    #[serde(default)]
    pub table: String,
    /// Table columns in storage order
    #[serde(default)]
    pub columns: Vec<String>,
    /// Columns never exposed in serialized output
    #[serde(default)]
    pub hidden: Vec<String>,
    /// Declared casts (column -> cast type)
    #[serde(default)]
    pub casts: IndexMap<String, String>,
    /// Columns treated as dates
    #[serde(default)]
    pub dates: Vec<String>,
    /// Computed attributes appended to the serialized form
    #[serde(default)]
    pub appends: Vec<String>,
    /// Relations in declaration order
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// A declared relation from one model to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Accessor name on the owning model
    pub method: String,
    /// Relation kind
    pub kind: RelationKind,
    /// Name of the related model
    pub related: String,
}

/// Relation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsTo,
    BelongsToMany,
    HasOneThrough,
    HasManyThrough,
    MorphOne,
    MorphMany,
    MorphTo,
    MorphToMany,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::HasOne => "HasOne",
            RelationKind::HasMany => "HasMany",
            RelationKind::BelongsTo => "BelongsTo",
            RelationKind::BelongsToMany => "BelongsToMany",
            RelationKind::HasOneThrough => "HasOneThrough",
            RelationKind::HasManyThrough => "HasManyThrough",
            RelationKind::MorphOne => "MorphOne",
            RelationKind::MorphMany => "MorphMany",
            RelationKind::MorphTo => "MorphTo",
            RelationKind::MorphToMany => "MorphToMany",
        }
    }

    /// Collection-typed relations are documented as arrays
    pub fn is_collection(&self) -> bool {
        self.as_str().contains("Many")
    }
}

impl ModelDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Name of the definition generated for this model
    pub fn definition_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden.iter().any(|hidden| hidden == column)
    }

    pub fn is_date(&self, column: &str) -> bool {
        self.dates.iter().any(|date| date == column)
    }

    pub fn cast_of(&self, column: &str) -> Option<&str> {
        self.casts.get(column).map(String::as_str)
    }

    /// Columns followed by appended attributes, minus hidden ones
    pub fn visible_attributes(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .chain(self.appends.iter())
            .map(String::as_str)
            .filter(move |column| !self.is_hidden(column))
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_hidden(mut self, hidden: &[&str]) -> Self {
        self.hidden = hidden.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_cast(mut self, column: &str, cast: &str) -> Self {
        self.casts.insert(column.to_string(), cast.to_string());
        self
    }

    pub fn with_dates(mut self, dates: &[&str]) -> Self {
        self.dates = dates.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_appends(mut self, appends: &[&str]) -> Self {
        self.appends = appends.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_relation(mut self, method: &str, kind: RelationKind, related: &str) -> Self {
        self.relations.push(Relation {
            method: method.to_string(),
            kind,
            related: related.to_string(),
        });
        self
    }
}

/// Lookup table of every model known to the application
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelDescriptor>,
}

impl ModelRegistry {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        debug!("Initializing ModelRegistry with {} models", models.len());
        let models = models
            .into_iter()
            .map(|model| (model.name.clone(), model))
            .collect();
        Self { models }
    }

    /// Find a model by its full name. An unqualified name matches the model
    /// with that short name, and fails when several models share it.
    pub fn get(&self, name: &str) -> Result<&ModelDescriptor> {
        if let Some(model) = self.models.get(name) {
            return Ok(model);
        }
        if short_name(name) != name {
            return Err(Error::ModelNotFound(name.to_string()));
        }

        let mut matches = self
            .models
            .values()
            .filter(|model| model.definition_name() == name);
        match (matches.next(), matches.next()) {
            (Some(model), None) => Ok(model),
            (Some(_), Some(_)) => Err(Error::AmbiguousModel(name.to_string())),
            _ => Err(Error::ModelNotFound(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
