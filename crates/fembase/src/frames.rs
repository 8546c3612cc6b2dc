//! Node-averaged normal-tangential frames on boundary elements.
//!
//! Normals are accumulated per node over all elements that share it,
//! weighted by the basis functions and integration weights, then normalized.
//! In 2D the tangent `dx/dξ` is rotated by `Q = [[0, 1], [-1, 0]]`, so a
//! boundary traversed counter-clockwise gets outward normals. In 3D the
//! normal is `t1 × t2`.
//!
//! The accumulation runs element-parallel and is reduced serially before
//! normalization; results are written back onto every element as the nodal
//! fields [`NORMAL_FIELD`] and [`ROTATION_FIELD`].

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::{FemError, Result};
use crate::evaluator::{Configuration, ElementEvaluator};
use crate::field::{FieldStore, FieldValue};
use crate::mesh::{Element, NodeId};

/// Nodal field holding unit normals (`phys_dim x n`)
pub const NORMAL_FIELD: &str = "normal";

/// Nodal tensor field holding `[n t1 (t2)]` per node
pub const ROTATION_FIELD: &str = "normal-tangential coordinates";

/// Unit normal and tangents at one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodalFrame {
    pub normal: DVector<f64>,
    pub tangents: Vec<DVector<f64>>,
}

impl NodalFrame {
    /// Orthonormal frame from a unit normal
    fn from_normal(normal: DVector<f64>) -> Self {
        let tangents = match normal.len() {
            2 => vec![DVector::from_vec(vec![-normal[1], normal[0]])],
            _ => {
                // axis least aligned with the normal; ties go to the later axis
                let mut axis = 0;
                for k in 1..normal.len() {
                    if normal[k].abs() <= normal[axis].abs() {
                        axis = k;
                    }
                }
                let e = DVector::from_fn(normal.len(), |i, _| if i == axis { 1.0 } else { 0.0 });
                let t1 = (&e - &normal * normal.dot(&e)).normalize();
                let t2 = normal.cross(&t1);
                vec![t1, t2]
            }
        };
        Self { normal, tangents }
    }

    /// Rotation matrix with columns `[n t1 (t2)]`
    pub fn rotation(&self) -> DMatrix<f64> {
        let mut columns = Vec::with_capacity(1 + self.tangents.len());
        columns.push(self.normal.clone());
        columns.extend(self.tangents.iter().cloned());
        DMatrix::from_columns(&columns)
    }
}

/// Compute node-averaged frames over `elements` and store them at `time`
///
/// Every element must be a boundary element, i.e. its reference dimension is
/// one less than its physical dimension (2 or 3).
///
/// # Errors
/// - `Unsupported` for elements that are not boundary elements
/// - `DegenerateNormal` if the accumulated normal of a node vanishes or is
///   not finite
///
/// On error no element is modified.
pub fn compute_normal_tangential_frames(
    evaluator: &ElementEvaluator,
    elements: &mut [Element],
    time: f64,
    configuration: Configuration,
) -> Result<BTreeMap<NodeId, NodalFrame>> {
    let contributions: Vec<Vec<(NodeId, DVector<f64>)>> = elements
        .par_iter()
        .map(|element| accumulate(evaluator, element, time, configuration))
        .collect::<Result<_>>()?;

    let mut sums: BTreeMap<NodeId, DVector<f64>> = BTreeMap::new();
    for (node, normal) in contributions.into_iter().flatten() {
        match sums.get_mut(&node) {
            Some(sum) if sum.len() == normal.len() => *sum += normal,
            Some(sum) => {
                return Err(FemError::shape(
                    format!("normal dimension at node {node}"),
                    sum.len(),
                    normal.len(),
                ));
            }
            None => {
                sums.insert(node, normal);
            }
        }
    }

    let tolerance = evaluator.config().degeneracy_tolerance;
    let mut frames = BTreeMap::new();
    for (node, sum) in sums {
        let length = sum.norm();
        if !length.is_finite() || length <= tolerance {
            return Err(FemError::DegenerateNormal { node, length });
        }
        frames.insert(node, NodalFrame::from_normal(sum / length));
    }

    // every element is updated or none is
    let updated: Vec<FieldStore> = elements
        .par_iter()
        .map(|element| framed_fields(element, &frames, time))
        .collect::<Result<_>>()?;
    elements
        .par_iter_mut()
        .zip(updated)
        .for_each(|(element, fields)| *element.fields_mut() = fields);

    log::debug!(
        "built normal-tangential frames at {} nodes from {} elements (time {})",
        frames.len(),
        elements.len(),
        time
    );
    Ok(frames)
}

/// Weighted normal contributions of one element, one entry per local node
fn accumulate(
    evaluator: &ElementEvaluator,
    element: &Element,
    time: f64,
    configuration: Configuration,
) -> Result<Vec<(NodeId, DVector<f64>)>> {
    let x = evaluator.nodal_coordinates(element, time, configuration)?;
    let phys_dim = x.nrows();
    if !matches!(phys_dim, 2 | 3) || element.dim() + 1 != phys_dim {
        return Err(FemError::Unsupported(format!(
            "normals of {}-dimensional element {} in {} dimensions",
            element.dim(),
            element.id(),
            phys_dim
        )));
    }

    let reference = element.reference();
    let mut normals: Vec<DVector<f64>> = vec![DVector::zeros(phys_dim); element.num_nodes()];
    let order = evaluator.config().frame_integration_order;
    for ip in evaluator.integration_points(element, order) {
        let n = reference.basis(&ip.coords)?;
        let j = reference.basis_derivative(&ip.coords)? * x.transpose();
        let normal = if phys_dim == 2 {
            DVector::from_vec(vec![j[(0, 1)], -j[(0, 0)]])
        } else {
            let t1 = j.row(0).transpose();
            let t2 = j.row(1).transpose();
            t1.cross(&t2)
        };
        for (acc, &ni) in normals.iter_mut().zip(n.iter()) {
            *acc += &normal * (ip.weight * ni);
        }
    }

    Ok(element
        .connectivity()
        .iter()
        .copied()
        .zip(normals)
        .collect())
}

/// Copy of the element's fields with the frames of its nodes added at `time`
fn framed_fields(
    element: &Element,
    frames: &BTreeMap<NodeId, NodalFrame>,
    time: f64,
) -> Result<FieldStore> {
    let mut node_frames = Vec::with_capacity(element.num_nodes());
    for &node in element.connectivity() {
        let frame = frames.get(&node).ok_or_else(|| FemError::MissingNodeData {
            name: NORMAL_FIELD.to_string(),
            node,
        })?;
        node_frames.push(frame);
    }

    let normals: Vec<DVector<f64>> = node_frames.iter().map(|f| f.normal.clone()).collect();
    let rotations: Vec<DMatrix<f64>> = node_frames.iter().map(|f| f.rotation()).collect();
    let mut fields = element.fields().clone();
    fields.update(NORMAL_FIELD, time, FieldValue::Nodal(DMatrix::from_columns(&normals)))?;
    fields.update(ROTATION_FIELD, time, FieldValue::NodalTensor(rotations))?;
    Ok(fields)
}
