//! Lagrange finite element kernel.
//!
//! This crate derives interpolation bases from reference node layouts and
//! evaluates them on element instances: basis values and derivatives,
//! field interpolation, Jacobians in the reference or deformed configuration,
//! spatial gradients, dual bases and node-averaged normal-tangential frames.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use fembase::{Configuration, ElementEvaluator, ElementKind, ElementLibrary};
//!
//! let library = ElementLibrary::new()?;
//! let mut element = library.create_element(1, ElementKind::Quad4, vec![1, 2, 3, 4])?;
//!
//! let mut coords = HashMap::new();
//! coords.insert(1, [0.0, 0.0]);
//! coords.insert(2, [2.0, 0.0]);
//! coords.insert(3, [2.0, 1.0]);
//! coords.insert(4, [0.0, 1.0]);
//! element.set_nodal_field("geometry", &coords)?;
//!
//! let evaluator = ElementEvaluator::default();
//! let area = evaluator.measure(&element, 0.0, Configuration::Reference)?;
//! assert!((area - 2.0).abs() < 1e-12);
//! # Ok::<(), fembase::FemError>(())
//! ```

pub mod basis;
pub mod config;
pub mod dual_basis;
pub mod elements;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod frames;
pub mod mesh;
pub mod quadrature;

pub use basis::{LagrangeBasis, Monomial};
pub use config::KernelConfig;
pub use dual_basis::DualBasis;
pub use elements::{ElementKind, ElementLibrary, ReferenceElement, Topology};
pub use error::{FemError, Result};
pub use evaluator::{Configuration, ElementEvaluator};
pub use field::{Field, FieldStore, FieldValue, TimeStep};
pub use frames::{compute_normal_tangential_frames, NodalFrame, NORMAL_FIELD, ROTATION_FIELD};
pub use mesh::{Element, ElementId, NodeId};
pub use quadrature::{integration_points, IntegrationPoint};
