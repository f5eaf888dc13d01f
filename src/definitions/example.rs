//! Example values for definition properties.
//!
//! Sampling builds one throwaway record of a model through a factory and reads
//! an attribute off it. The record is created inside a transaction that is
//! always rolled back, so nothing it wrote survives the sample.

use crate::error::{Error, Result};
use crate::model::ModelDescriptor;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

/// A generated record: attribute name -> value
pub type Record = IndexMap<String, Value>;

/// Strategy producing an example value for one column of a model
pub trait ExampleSampler {
    /// Returns `Ok(None)` when no example can be produced for expected reasons
    /// (no factory, factory rejected its arguments).
    fn sample(&self, model: &ModelDescriptor, column: &str) -> Result<Option<String>>;
}

/// Sampler used when example generation is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExamples;

impl ExampleSampler for NoExamples {
    fn sample(&self, _model: &ModelDescriptor, _column: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Transaction control over the connection factories write through
pub trait Connection {
    fn begin_transaction(&self) -> Result<()>;
    fn rollback(&self);
}

impl<C: Connection + ?Sized> Connection for &C {
    fn begin_transaction(&self) -> Result<()> {
        (**self).begin_transaction()
    }

    fn rollback(&self) {
        (**self).rollback()
    }
}

/// Connection for applications without a database behind their factories
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConnection;

impl Connection for NoopConnection {
    fn begin_transaction(&self) -> Result<()> {
        Ok(())
    }

    fn rollback(&self) {}
}

/// Open transaction that is rolled back when dropped
pub struct TransactionGuard<'a, C: Connection + ?Sized> {
    connection: &'a C,
}

impl<'a, C: Connection + ?Sized> TransactionGuard<'a, C> {
    pub fn begin(connection: &'a C) -> Result<Self> {
        connection.begin_transaction()?;
        Ok(Self { connection })
    }
}

impl<C: Connection + ?Sized> Drop for TransactionGuard<'_, C> {
    fn drop(&mut self) {
        self.connection.rollback();
    }
}

/// Failure modes of a model factory
#[derive(Debug, Clone, PartialEq)]
pub enum FactoryError {
    /// The model has no factory
    NotRegistered,
    /// The factory rejected its arguments
    InvalidArgument(String),
    /// Any other failure; aborts generation
    Other(String),
}

/// Builds model records for sampling
pub trait ModelFactory {
    fn create(&self, model: &ModelDescriptor) -> std::result::Result<Record, FactoryError>;
}

impl<F: ModelFactory + ?Sized> ModelFactory for &F {
    fn create(&self, model: &ModelDescriptor) -> std::result::Result<Record, FactoryError> {
        (**self).create(model)
    }
}

/// Factory serving fixed records, keyed by model name (full or short)
#[derive(Debug, Clone, Default)]
pub struct FixtureFactory {
    records: IndexMap<String, Record>,
}

impl FixtureFactory {
    pub fn new(records: IndexMap<String, Record>) -> Self {
        Self { records }
    }
}

impl ModelFactory for FixtureFactory {
    fn create(&self, model: &ModelDescriptor) -> std::result::Result<Record, FactoryError> {
        self.records
            .get(&model.name)
            .or_else(|| self.records.get(model.definition_name()))
            .cloned()
            .ok_or(FactoryError::NotRegistered)
    }
}

/// Samples examples from factory-built records, one rolled-back transaction
/// per sample
pub struct FactorySampler<F, C> {
    factory: F,
    connection: C,
}

impl<F: ModelFactory, C: Connection> FactorySampler<F, C> {
    pub fn new(factory: F, connection: C) -> Self {
        Self {
            factory,
            connection,
        }
    }
}

impl<F: ModelFactory, C: Connection> ExampleSampler for FactorySampler<F, C> {
    fn sample(&self, model: &ModelDescriptor, column: &str) -> Result<Option<String>> {
        let _transaction = TransactionGuard::begin(&self.connection)?;

        let record = match self.factory.create(model) {
            Ok(record) => record,
            Err(FactoryError::NotRegistered) => {
                debug!("No factory for {}", model.name);
                return Ok(None);
            }
            Err(FactoryError::InvalidArgument(message)) => {
                debug!("Factory for {} rejected its arguments: {}", model.name, message);
                return Ok(None);
            }
            Err(FactoryError::Other(message)) => {
                return Err(Error::Factory {
                    model: model.name.clone(),
                    message,
                });
            }
        };

        Ok(record.get(column).and_then(value_to_example))
    }
}

/// Render an attribute value as an example string. Composite values are
/// rendered as their JSON text.
///
/// Booleans render as `true`/`false` rather than the `1`/empty string a loose
/// string cast would give; the empty string would read as a missing example.
fn value_to_example(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
