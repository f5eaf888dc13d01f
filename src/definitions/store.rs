use crate::schema::Schema;
use indexmap::IndexMap;
use log::debug;

/// Insertion-ordered mapping from definition name to definition body.
///
/// A name is inserted at most once; later attempts are ignored and reported to
/// the caller so it can stop expanding from that node.
#[derive(Debug, Clone, Default)]
pub struct DefinitionStore {
    definitions: IndexMap<String, Schema>,
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Insert `schema` under `name` unless the name is already defined.
    /// Returns whether the definition was inserted.
    pub fn define(&mut self, name: &str, schema: Schema) -> bool {
        if self.contains(name) {
            debug!("Definition {} already exists", name);
            return false;
        }

        debug!("Defining {}", name);
        self.definitions.insert(name.to_string(), schema);
        true
    }

    /// Set (or replace) a property on an existing object definition
    pub fn set_property(&mut self, definition: &str, property: &str, schema: Schema) {
        if let Some(target) = self.definitions.get_mut(definition) {
            target
                .properties
                .get_or_insert_with(IndexMap::new)
                .insert(property.to_string(), schema);
        }
    }

    /// Merge definitions; names already present keep their first body
    pub fn merge(&mut self, definitions: IndexMap<String, Schema>) {
        for (name, schema) in definitions {
            self.define(&name, schema);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Emit the definitions most-recently-defined first
    pub fn into_reversed(self) -> IndexMap<String, Schema> {
        self.definitions.into_iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_once() {
        let mut store = DefinitionStore::new();
        assert!(store.define("User", Schema::object(IndexMap::new())));
        assert!(!store.define("User", Schema::string()));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("User").unwrap().schema_type.as_deref(),
            Some("object")
        );
    }

    #[test]
    fn test_merge_first_registration_wins() {
        let mut store = DefinitionStore::new();
        store.define("NotFound", Schema::typed("object"));

        let mut incoming = IndexMap::new();
        incoming.insert("NotFound".to_string(), Schema::string());
        incoming.insert("Forbidden".to_string(), Schema::string());
        store.merge(incoming);

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get("NotFound").unwrap().schema_type.as_deref(),
            Some("object")
        );
    }

    #[test]
    fn test_set_property_on_missing_definition_is_ignored() {
        let mut store = DefinitionStore::new();
        store.set_property("Ghost", "posts", Schema::reference("Post"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reverse_emission() {
        let mut store = DefinitionStore::new();
        store.define("A", Schema::string());
        store.define("B", Schema::string());
        store.define("C", Schema::string());

        let names: Vec<_> = store.into_reversed().into_keys().collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }
}
