//! Definition generation for a single route.
//!
//! The pieces, leaf-first:
//!
//! 1. [`column_type`] - maps a column's cast to a primitive schema
//! 2. [`example`] - samples example values from a throwaway model record
//! 3. [`store`] - insertion-ordered, define-once definition storage
//! 4. [`relation_walker`] - builds model definitions and follows relations
//! 5. [`errors`] - error-response definitions keyed by exception type
//! 6. [`generator`] - sequences the above for one route

pub mod column_type;
pub mod errors;
pub mod example;
pub mod generator;
pub mod relation_walker;
pub mod store;

pub use errors::{ErrorDefinition, ErrorSchemaMerger, HandlerRegistry};
pub use example::{ExampleSampler, NoExamples};
pub use generator::DefinitionGenerator;
pub use store::DefinitionStore;
