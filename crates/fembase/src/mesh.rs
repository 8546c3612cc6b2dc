//! Element instances.
//!
//! An element ties an ordered connectivity to the shared reference element of
//! its kind and carries its own field store (geometry, displacement, ...).

use std::collections::HashMap;
use std::sync::Arc;

use crate::elements::{ElementKind, ReferenceElement};
use crate::error::{FemError, Result};
use crate::field::{Field, FieldStore, FieldValue};

/// Global node identifier
pub type NodeId = usize;

/// Global element identifier
pub type ElementId = usize;

/// An element in the finite element mesh
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    connectivity: Vec<NodeId>,
    reference: Arc<ReferenceElement>,
    fields: FieldStore,
}

impl Element {
    /// Create a new element; the connectivity must match the node count
    pub fn new(
        id: ElementId,
        reference: Arc<ReferenceElement>,
        connectivity: Vec<NodeId>,
    ) -> Result<Self> {
        let expected = reference.num_nodes();
        if connectivity.len() != expected {
            return Err(FemError::shape(
                format!("connectivity of element {} ({})", id, reference.kind()),
                expected,
                connectivity.len(),
            ));
        }
        Ok(Self {
            id,
            connectivity,
            fields: FieldStore::new(expected),
            reference,
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.reference.kind()
    }

    /// Global node ids in local node order
    pub fn connectivity(&self) -> &[NodeId] {
        &self.connectivity
    }

    pub fn reference(&self) -> &ReferenceElement {
        &self.reference
    }

    pub fn num_nodes(&self) -> usize {
        self.connectivity.len()
    }

    /// Reference dimension
    pub fn dim(&self) -> usize {
        self.reference.dim()
    }

    /// Insert or overwrite a field
    pub fn set_field(&mut self, name: impl Into<String>, field: impl Into<Field>) -> Result<()> {
        self.fields.set(name, field)
    }

    /// Insert or overwrite the value of `name` at `time`
    pub fn update_field(&mut self, name: &str, time: f64, value: FieldValue) -> Result<()> {
        self.fields.update(name, time, value)
    }

    /// Time-invariant nodal field projected from node-keyed data
    pub fn set_nodal_field<V: AsRef<[f64]>>(
        &mut self,
        name: &str,
        data: &HashMap<NodeId, V>,
    ) -> Result<()> {
        let value = FieldValue::from_node_map(name, &self.connectivity, data)?;
        self.fields.set(name, value)
    }

    /// Nodal field step at `time` projected from node-keyed data
    pub fn update_nodal_field<V: AsRef<[f64]>>(
        &mut self,
        name: &str,
        time: f64,
        data: &HashMap<NodeId, V>,
    ) -> Result<()> {
        let value = FieldValue::from_node_map(name, &self.connectivity, data)?;
        self.fields.update(name, time, value)
    }

    /// Value of `name` at `time`
    pub fn field(&self, name: &str, time: f64) -> Result<&FieldValue> {
        self.fields.get(name, time)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.has(name)
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }
}
