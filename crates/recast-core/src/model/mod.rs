//! Structural type model consumed by the engine.
//!
//! The host's semantic model is abstracted behind [`TypeModel`]: the engine never
//! talks to a compiler API, it only reads [`RecordDefinition`]s looked up by name.
//! [`TypeCatalog`] is the in-memory implementation used by the loader and by tests.

pub mod record;
pub mod types;

pub use record::{
    AccessContext, ConstructorCandidate, MethodDescriptor, Parameter, PropertyDescriptor,
    RecordDefinition, Visibility,
};
pub use types::{CollectionKind, TypeDescriptor, TypeKind};

use crate::naming::TypeName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Read-only access to record shapes.
pub trait TypeModel {
    /// Look up the structure of a record type by its nominal name.
    fn record(&self, name: &TypeName) -> Option<&RecordDefinition>;
}

/// Record definitions keyed by type name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RecordDefinition>", into = "Vec<RecordDefinition>")]
pub struct TypeCatalog {
    records: IndexMap<TypeName, RecordDefinition>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record definition.
    pub fn insert(&mut self, record: RecordDefinition) -> Option<RecordDefinition> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn with(mut self, record: RecordDefinition) -> Self {
        self.insert(record);
        self
    }

    /// Merge another catalog into this one; later definitions win.
    pub fn extend(&mut self, other: TypeCatalog) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordDefinition> {
        self.records.values()
    }
}

impl TypeModel for TypeCatalog {
    fn record(&self, name: &TypeName) -> Option<&RecordDefinition> {
        self.records.get(name)
    }
}

impl From<Vec<RecordDefinition>> for TypeCatalog {
    fn from(records: Vec<RecordDefinition>) -> Self {
        let mut catalog = TypeCatalog::new();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }
}

impl From<TypeCatalog> for Vec<RecordDefinition> {
    fn from(catalog: TypeCatalog) -> Self {
        catalog.records.into_values().collect()
    }
}
