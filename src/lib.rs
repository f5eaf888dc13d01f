//! Swagger generator - Swagger 2.0 documents from route tables and model descriptors.
//!
//! The application being documented is described by statically declared
//! descriptors: models (columns, hidden columns, casts, dates, appended
//! attributes, relations), request-validation types with their rules, and
//! routes (methods, bound model, declared exceptions, middleware).
//!
//! # Architecture
//!
//! 1. [`model`] / [`route`] - descriptors of the documented application
//! 2. [`manifest`] / [`config`] - loading descriptors and per-version settings
//! 3. [`definitions`] - model and error definitions for a single route
//! 4. [`parameters`] - path, query and body parameters
//! 5. [`security`] - security definitions and requirements
//! 6. [`swagger_builder`] - assembles the complete document
//! 7. [`serializer`] - serializes the document to JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_models::{
//!     definitions::{errors::default_error_definitions, DefinitionGenerator, HandlerRegistry},
//!     model::{ModelDescriptor, ModelRegistry, RelationKind},
//!     route::{HttpMethod, Route},
//! };
//!
//! let registry = ModelRegistry::new(vec![
//!     ModelDescriptor::new("App\\Models\\User")
//!         .with_columns(&["id", "email", "password"])
//!         .with_hidden(&["password"])
//!         .with_relation("posts", RelationKind::HasMany, "App\\Models\\Post"),
//!     ModelDescriptor::new("App\\Models\\Post").with_columns(&["id", "title"]),
//! ]);
//! let errors = default_error_definitions();
//! let handlers = HandlerRegistry::default();
//!
//! let route = Route::new("/api/users/{user}", vec![HttpMethod::Get])
//!     .with_model("User")
//!     .with_exception("ModelNotFoundException");
//!
//! let definitions = DefinitionGenerator::new(&registry, &errors, &handlers)
//!     .with_relations(true)
//!     .generate(&route)
//!     .unwrap();
//! println!("{}", serde_json::to_string_pretty(&definitions).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod definitions;
pub mod error;
pub mod manifest;
pub mod model;
pub mod parameters;
pub mod route;
pub mod schema;
pub mod security;
pub mod serializer;
pub mod swagger_builder;
