use super::column_type::map_column_type;
use super::example::ExampleSampler;
use super::store::DefinitionStore;
use crate::error::Result;
use crate::model::{ModelDescriptor, ModelRegistry};
use crate::schema::Schema;
use indexmap::IndexMap;
use log::debug;

/// Builds model definitions and follows their relations.
///
/// Every model reached is defined at most once. Reaching an already-defined
/// model still attaches the relation property on the referring definition,
/// but expansion stops there, which is what terminates cyclic relation graphs.
/// There is no depth limit beyond that: a graph with many distinct models is
/// walked in full.
pub struct RelationWalker<'a> {
    registry: &'a ModelRegistry,
    sampler: Option<&'a dyn ExampleSampler>,
}

impl<'a> RelationWalker<'a> {
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self {
            registry,
            sampler: None,
        }
    }

    /// Enrich every property with a sampled example value
    pub fn with_examples(mut self, sampler: &'a dyn ExampleSampler) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Define `root` and everything reachable from it
    pub fn walk(&self, root: &ModelDescriptor, store: &mut DefinitionStore) -> Result<()> {
        if !self.define_model(root, store)? {
            return Ok(());
        }
        self.expand_relations(root, store)
    }

    /// Define a single model. Returns `false` when it was already defined.
    pub fn define_model(&self, model: &ModelDescriptor, store: &mut DefinitionStore) -> Result<bool> {
        let name = model.definition_name();
        if store.contains(name) {
            debug!("Skipping {}, already defined", name);
            return Ok(false);
        }

        debug!("Defining {} from table {}", name, model.table);
        let schema = Schema::object(self.properties_of(model)?);
        Ok(store.define(name, schema))
    }

    /// Attach a property per relation of `model` and define the related
    /// models, recursing into each one that was not defined before.
    pub fn expand_relations(&self, model: &ModelDescriptor, store: &mut DefinitionStore) -> Result<()> {
        let owner = model.definition_name();

        for relation in &model.relations {
            let related = self.registry.get(&relation.related)?;
            debug!(
                "Following {}::{} ({}) to {}",
                owner,
                relation.method,
                relation.kind.as_str(),
                related.definition_name()
            );

            let mut property = Schema::reference(related.definition_name());
            if relation.kind.is_collection() {
                property = Schema::array(property);
            }
            store.set_property(owner, &relation.method, property);

            if !self.define_model(related, store)? {
                continue;
            }
            self.expand_relations(related, store)?;
        }

        Ok(())
    }

    fn properties_of(&self, model: &ModelDescriptor) -> Result<IndexMap<String, Schema>> {
        let mut properties = IndexMap::new();

        for column in model.visible_attributes() {
            let mut property = map_column_type(model.cast_of(column), model.is_date(column));
            if let Some(sampler) = self.sampler {
                property.example = sampler.sample(model, column)?;
            }
            properties.insert(column.to_string(), property);
        }

        Ok(properties)
    }
}
