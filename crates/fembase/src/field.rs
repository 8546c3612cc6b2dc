//! Per-element field storage.
//!
//! A field is either time-invariant or a series of time steps with strictly
//! increasing times. Lookup is exact: a time-variant field queried at a time
//! that was never stored is an error, there is no interpolation in time.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::error::{FemError, Result};
use crate::mesh::NodeId;

/// Value stored in a field at one instant
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Spatially constant scalar
    Scalar(f64),
    /// Spatially constant vector
    Vector(DVector<f64>),
    /// Spatially constant tensor
    Tensor(DMatrix<f64>),
    /// One column per element node (`components x n`)
    Nodal(DMatrix<f64>),
    /// One matrix per element node
    NodalTensor(Vec<DMatrix<f64>>),
}

impl FieldValue {
    /// Nodal field from per-node vectors, in connectivity order
    pub fn nodal_vectors(columns: &[DVector<f64>]) -> Result<Self> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(FemError::shape("nodal vector components", rows, bad.len()));
        }
        Ok(FieldValue::Nodal(DMatrix::from_fn(rows, columns.len(), |r, c| {
            columns[c][r]
        })))
    }

    /// Nodal scalar field (a `1 x n` nodal array)
    pub fn nodal_scalars(values: &[f64]) -> Self {
        FieldValue::Nodal(DMatrix::from_row_slice(1, values.len(), values))
    }

    /// Project node-keyed data through `connectivity`
    ///
    /// Column `i` of the result holds `data[connectivity[i]]`. Every node must
    /// be present and all entries must have the same length.
    pub fn from_node_map<V: AsRef<[f64]>>(
        name: &str,
        connectivity: &[NodeId],
        data: &HashMap<NodeId, V>,
    ) -> Result<Self> {
        let mut columns = Vec::with_capacity(connectivity.len());
        for &node in connectivity {
            let values = data.get(&node).ok_or_else(|| FemError::MissingNodeData {
                name: name.to_string(),
                node,
            })?;
            columns.push(DVector::from_column_slice(values.as_ref()));
        }
        Self::nodal_vectors(&columns)
    }

    pub fn is_nodal(&self) -> bool {
        matches!(self, FieldValue::Nodal(_) | FieldValue::NodalTensor(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FieldValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            FieldValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&DMatrix<f64>> {
        match self {
            FieldValue::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_nodal(&self) -> Option<&DMatrix<f64>> {
        match self {
            FieldValue::Nodal(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_nodal_tensor(&self) -> Option<&[DMatrix<f64>]> {
        match self {
            FieldValue::NodalTensor(t) => Some(t),
            _ => None,
        }
    }

    /// Variant and dimensions, used to keep time series homogeneous
    fn signature(&self) -> (u8, usize, usize) {
        match self {
            FieldValue::Scalar(_) => (0, 1, 1),
            FieldValue::Vector(v) => (1, v.len(), 1),
            FieldValue::Tensor(t) => (2, t.nrows(), t.ncols()),
            FieldValue::Nodal(m) => (3, m.nrows(), m.ncols()),
            FieldValue::NodalTensor(t) => {
                let (r, c) = t.first().map(|m| m.shape()).unwrap_or((0, 0));
                (4, r, c)
            }
        }
    }

    /// Check node counts against the owning element
    fn validate(&self, name: &str, num_nodes: usize) -> Result<()> {
        match self {
            FieldValue::Nodal(m) if m.ncols() != num_nodes => Err(FemError::shape(
                format!("nodal field '{name}'"),
                num_nodes,
                m.ncols(),
            )),
            FieldValue::NodalTensor(t) => {
                if t.len() != num_nodes {
                    return Err(FemError::shape(
                        format!("nodal tensor field '{name}'"),
                        num_nodes,
                        t.len(),
                    ));
                }
                let shape = t.first().map(|m| m.shape()).unwrap_or((0, 0));
                if let Some(bad) = t.iter().find(|m| m.shape() != shape) {
                    return Err(FemError::shape(
                        format!("tensor entries of field '{name}'"),
                        shape.0 * shape.1,
                        bad.nrows() * bad.ncols(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<DVector<f64>> for FieldValue {
    fn from(value: DVector<f64>) -> Self {
        FieldValue::Vector(value)
    }
}

/// Single stored time step
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStep {
    pub time: f64,
    pub value: FieldValue,
}

/// Time-invariant value or time series
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Constant(FieldValue),
    TimeSeries(Vec<TimeStep>),
}

impl Field {
    pub fn constant(value: impl Into<FieldValue>) -> Self {
        Field::Constant(value.into())
    }

    /// Time series with a single step
    pub fn at(time: f64, value: impl Into<FieldValue>) -> Self {
        Field::TimeSeries(vec![TimeStep {
            time,
            value: value.into(),
        }])
    }

    /// Time series from unordered steps; duplicates are rejected on insertion
    pub fn series<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = (f64, FieldValue)>,
    {
        let mut steps: Vec<TimeStep> = steps
            .into_iter()
            .map(|(time, value)| TimeStep { time, value })
            .collect();
        steps.sort_by(|a, b| a.time.total_cmp(&b.time));
        Field::TimeSeries(steps)
    }

    pub fn is_time_variant(&self) -> bool {
        matches!(self, Field::TimeSeries(_))
    }

    /// Exact-time lookup; constant fields ignore `time`
    pub fn value_at(&self, time: f64) -> Option<&FieldValue> {
        match self {
            Field::Constant(value) => Some(value),
            Field::TimeSeries(steps) => steps
                .binary_search_by(|step| step.time.total_cmp(&time))
                .ok()
                .map(|i| &steps[i].value),
        }
    }

    /// Stored times (empty for constant fields)
    pub fn times(&self) -> Vec<f64> {
        match self {
            Field::Constant(_) => Vec::new(),
            Field::TimeSeries(steps) => steps.iter().map(|s| s.time).collect(),
        }
    }

    /// Latest value (the constant itself for time-invariant fields)
    pub fn last(&self) -> Option<&FieldValue> {
        match self {
            Field::Constant(value) => Some(value),
            Field::TimeSeries(steps) => steps.last().map(|s| &s.value),
        }
    }

    fn validate(&self, name: &str, num_nodes: usize) -> Result<()> {
        match self {
            Field::Constant(value) => value.validate(name, num_nodes),
            Field::TimeSeries(steps) => {
                let invalid = |reason: String| FemError::InvalidTimeSeries {
                    name: name.to_string(),
                    reason,
                };
                let Some(first) = steps.first() else {
                    return Err(invalid("no time steps".to_string()));
                };
                let signature = first.value.signature();
                for (i, step) in steps.iter().enumerate() {
                    if !step.time.is_finite() {
                        return Err(invalid(format!("non-finite time {}", step.time)));
                    }
                    if i > 0 && step.time <= steps[i - 1].time {
                        return Err(invalid(format!(
                            "time {} does not increase after {}",
                            step.time,
                            steps[i - 1].time
                        )));
                    }
                    if step.value.signature() != signature {
                        return Err(invalid(format!(
                            "value at time {} changes shape from {:?} to {:?}",
                            step.time,
                            signature,
                            step.value.signature()
                        )));
                    }
                    step.value.validate(name, num_nodes)?;
                }
                Ok(())
            }
        }
    }
}

impl From<FieldValue> for Field {
    fn from(value: FieldValue) -> Self {
        Field::Constant(value)
    }
}

/// Name -> field map of one element
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    num_nodes: usize,
    fields: HashMap<String, Field>,
}

impl FieldStore {
    /// Empty store for an element with `num_nodes` nodes
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            fields: HashMap::new(),
        }
    }

    /// Insert or overwrite a field after validating its shape
    pub fn set(&mut self, name: impl Into<String>, field: impl Into<Field>) -> Result<()> {
        let name = name.into();
        let field = field.into();
        field.validate(&name, self.num_nodes)?;
        self.fields.insert(name, field);
        Ok(())
    }

    /// Insert or overwrite the step at `time`
    ///
    /// Creates the field when absent. A time-invariant field is replaced by a
    /// series holding only this step.
    pub fn update(&mut self, name: &str, time: f64, value: FieldValue) -> Result<()> {
        let step = TimeStep { time, value };
        let steps = match self.fields.get(name) {
            Some(Field::TimeSeries(existing)) => {
                let mut steps = existing.clone();
                match steps.binary_search_by(|s| s.time.total_cmp(&time)) {
                    Ok(i) => steps[i] = step,
                    Err(i) => steps.insert(i, step),
                }
                steps
            }
            Some(Field::Constant(_)) => {
                log::debug!("field '{}' becomes time-variant at time {}", name, time);
                vec![step]
            }
            None => vec![step],
        };
        self.set(name, Field::TimeSeries(steps))
    }

    /// Value of `name` at `time`
    pub fn get(&self, name: &str, time: f64) -> Result<&FieldValue> {
        self.fields
            .get(name)
            .and_then(|field| field.value_at(time))
            .ok_or_else(|| FemError::FieldNotFound {
                name: name.to_string(),
                time,
            })
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    /// Stored times of `name`; empty for time-invariant fields
    pub fn times(&self, name: &str) -> Option<Vec<f64>> {
        self.fields.get(name).map(Field::times)
    }

    /// Field names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }
}
