//! Element type registry.
//!
//! The catalogue is closed: every [`ElementKind`] has a compile-time reference
//! definition (node coordinates + monomial basis). [`ElementLibrary`] builds
//! the Lagrange basis of every kind once and hands out shared
//! [`ReferenceElement`]s.

use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, RowDVector};

use crate::basis::{LagrangeBasis, Monomial};
use crate::error::{FemError, Result};
use crate::mesh::{Element, ElementId, NodeId};

mod hexahedron;
mod quadrilateral;
mod segment;
mod tetrahedron;
mod triangle;

/// Reference domain shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// [-1, 1]
    Segment,
    /// Unit triangle (0,0), (1,0), (0,1)
    Triangle,
    /// [-1, 1]²
    Quadrilateral,
    /// Unit tetrahedron
    Tetrahedron,
    /// Unit triangle x [-1, 1]
    Wedge,
    /// [-1, 1]³
    Hexahedron,
}

impl Topology {
    pub fn dim(&self) -> usize {
        match self {
            Topology::Segment => 1,
            Topology::Triangle | Topology::Quadrilateral => 2,
            Topology::Tetrahedron | Topology::Wedge | Topology::Hexahedron => 3,
        }
    }

    /// Length/area/volume of the reference domain
    pub fn reference_measure(&self) -> f64 {
        match self {
            Topology::Segment => 2.0,
            Topology::Triangle => 0.5,
            Topology::Quadrilateral => 4.0,
            Topology::Tetrahedron => 1.0 / 6.0,
            Topology::Wedge => 1.0,
            Topology::Hexahedron => 8.0,
        }
    }

    /// Centroid of the reference domain
    pub fn centroid(&self) -> Vec<f64> {
        match self {
            Topology::Segment => vec![0.0],
            Topology::Triangle => vec![1.0 / 3.0, 1.0 / 3.0],
            Topology::Quadrilateral => vec![0.0, 0.0],
            Topology::Tetrahedron => vec![0.25, 0.25, 0.25],
            Topology::Wedge => vec![1.0 / 3.0, 1.0 / 3.0, 0.0],
            Topology::Hexahedron => vec![0.0, 0.0, 0.0],
        }
    }

    /// Whether `xi` lies in the reference domain, up to `tol`
    pub fn contains(&self, xi: &[f64], tol: f64) -> bool {
        if xi.len() != self.dim() {
            return false;
        }
        let in_interval = |x: f64| x.abs() <= 1.0 + tol;
        let in_simplex = |xs: &[f64]| {
            xs.iter().all(|&x| x >= -tol) && xs.iter().sum::<f64>() <= 1.0 + tol
        };
        match self {
            Topology::Segment | Topology::Quadrilateral | Topology::Hexahedron => {
                xi.iter().all(|&x| in_interval(x))
            }
            Topology::Triangle | Topology::Tetrahedron => in_simplex(xi),
            Topology::Wedge => in_simplex(&xi[..2]) && in_interval(xi[2]),
        }
    }
}

/// Compile-time description of a reference element
pub(crate) struct Definition {
    pub dim: usize,
    pub coordinates: &'static [[f64; 3]],
    pub monomials: &'static [Monomial],
}

/// Element kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// 2-node line
    Seg2,
    /// 3-node line
    Seg3,
    /// 3-node triangle
    Tri3,
    /// 6-node triangle
    Tri6,
    /// 4-node quadrilateral
    Quad4,
    /// 8-node serendipity quadrilateral
    Quad8,
    /// 9-node biquadratic quadrilateral
    Quad9,
    /// 4-node tetrahedron
    Tet4,
    /// 10-node tetrahedron
    Tet10,
    /// 6-node wedge
    Wedge6,
    /// 8-node hexahedron
    Hex8,
}

impl ElementKind {
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Seg2,
        ElementKind::Seg3,
        ElementKind::Tri3,
        ElementKind::Tri6,
        ElementKind::Quad4,
        ElementKind::Quad8,
        ElementKind::Quad9,
        ElementKind::Tet4,
        ElementKind::Tet10,
        ElementKind::Wedge6,
        ElementKind::Hex8,
    ];

    /// Position in [`ElementKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn description(&self) -> &'static str {
        match self {
            ElementKind::Seg2 => "2-node linear segment",
            ElementKind::Seg3 => "3-node quadratic segment",
            ElementKind::Tri3 => "3-node linear triangle",
            ElementKind::Tri6 => "6-node quadratic triangle",
            ElementKind::Quad4 => "4-node bilinear quadrilateral",
            ElementKind::Quad8 => "8-node serendipity quadrilateral",
            ElementKind::Quad9 => "9-node biquadratic quadrilateral",
            ElementKind::Tet4 => "4-node linear tetrahedron",
            ElementKind::Tet10 => "10-node quadratic tetrahedron",
            ElementKind::Wedge6 => "6-node linear wedge",
            ElementKind::Hex8 => "8-node trilinear hexahedron",
        }
    }

    pub fn topology(&self) -> Topology {
        match self {
            ElementKind::Seg2 | ElementKind::Seg3 => Topology::Segment,
            ElementKind::Tri3 | ElementKind::Tri6 => Topology::Triangle,
            ElementKind::Quad4 | ElementKind::Quad8 | ElementKind::Quad9 => {
                Topology::Quadrilateral
            }
            ElementKind::Tet4 | ElementKind::Tet10 => Topology::Tetrahedron,
            ElementKind::Wedge6 => Topology::Wedge,
            ElementKind::Hex8 => Topology::Hexahedron,
        }
    }

    /// Reference dimension
    pub fn dim(&self) -> usize {
        self.topology().dim()
    }

    pub fn num_nodes(&self) -> usize {
        self.definition().coordinates.len()
    }

    /// Quadrature order that integrates the mass matrix of an affine element
    pub fn default_integration_order(&self) -> usize {
        match self {
            ElementKind::Seg2 => 2,
            ElementKind::Seg3 => 3,
            ElementKind::Tri3 => 2,
            ElementKind::Tri6 => 4,
            ElementKind::Quad4 => 2,
            ElementKind::Quad8 | ElementKind::Quad9 => 3,
            ElementKind::Tet4 => 2,
            ElementKind::Tet10 => 4,
            ElementKind::Wedge6 => 2,
            ElementKind::Hex8 => 2,
        }
    }

    /// Map an Abaqus/CalculiX element name to its Lagrange kind
    ///
    /// Reduced-integration and hybrid suffixes share the geometry of the
    /// full element, so `C3D8R` and `C3D8I` both give `Hex8`.
    pub fn from_abaqus_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_uppercase();
        match upper.as_str() {
            "T2D2" | "T3D2" | "B21" | "B31" | "B31R" | "SAX1" => Some(ElementKind::Seg2),
            "T2D3" | "T3D3" | "B22" | "B32" | "B32R" | "SAX2" => Some(ElementKind::Seg3),
            "CPS3" | "CPE3" | "CAX3" | "S3" | "S3R" | "M3D3" | "DC2D3" => {
                Some(ElementKind::Tri3)
            }
            "CPS6" | "CPE6" | "CAX6" | "S6" | "M3D6" | "STRI65" | "DC2D6" => {
                Some(ElementKind::Tri6)
            }
            "CPS4" | "CPS4R" | "CPE4" | "CPE4R" | "CAX4" | "CAX4R" | "S4" | "S4R" | "M3D4"
            | "M3D4R" | "DC2D4" => Some(ElementKind::Quad4),
            "CPS8" | "CPS8R" | "CPE8" | "CPE8R" | "CAX8" | "CAX8R" | "S8" | "S8R" | "M3D8"
            | "M3D8R" | "DC2D8" => Some(ElementKind::Quad8),
            "S9R5" | "M3D9" | "M3D9R" => Some(ElementKind::Quad9),
            "C3D4" | "DC3D4" => Some(ElementKind::Tet4),
            "C3D10" | "C3D10T" | "C3D10M" | "DC3D10" => Some(ElementKind::Tet10),
            "C3D6" | "DC3D6" => Some(ElementKind::Wedge6),
            "C3D8" | "C3D8R" | "C3D8I" | "DC3D8" => Some(ElementKind::Hex8),
            _ => None,
        }
    }

    pub(crate) fn definition(&self) -> &'static Definition {
        match self {
            ElementKind::Seg2 => &segment::SEG2,
            ElementKind::Seg3 => &segment::SEG3,
            ElementKind::Tri3 => &triangle::TRI3,
            ElementKind::Tri6 => &triangle::TRI6,
            ElementKind::Quad4 => &quadrilateral::QUAD4,
            ElementKind::Quad8 => &quadrilateral::QUAD8,
            ElementKind::Quad9 => &quadrilateral::QUAD9,
            ElementKind::Tet4 => &tetrahedron::TET4,
            ElementKind::Tet10 => &tetrahedron::TET10,
            ElementKind::Wedge6 => &hexahedron::WEDGE6,
            ElementKind::Hex8 => &hexahedron::HEX8,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Immutable reference element: node layout and derived basis
#[derive(Debug, Clone)]
pub struct ReferenceElement {
    kind: ElementKind,
    coordinates: DMatrix<f64>,
    basis: LagrangeBasis,
}

impl ReferenceElement {
    /// Derive the reference element of `kind` from its definition
    pub fn new(kind: ElementKind) -> Result<Self> {
        let def = kind.definition();
        let coordinates = DMatrix::from_fn(def.dim, def.coordinates.len(), |k, i| {
            def.coordinates[i][k]
        });
        let basis = LagrangeBasis::new(&kind.to_string(), &coordinates, def.monomials)?;
        Ok(Self {
            kind,
            coordinates,
            basis,
        })
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    /// Reference dimension
    pub fn dim(&self) -> usize {
        self.basis.dim()
    }

    pub fn num_nodes(&self) -> usize {
        self.basis.len()
    }

    /// Reference node coordinates (`dim x n`, one column per node)
    pub fn coordinates(&self) -> &DMatrix<f64> {
        &self.coordinates
    }

    /// Coordinates of reference node `i`
    pub fn node(&self, i: usize) -> Vec<f64> {
        self.coordinates.column(i).iter().copied().collect()
    }

    pub fn lagrange_basis(&self) -> &LagrangeBasis {
        &self.basis
    }

    fn check_point(&self, xi: &[f64]) -> Result<()> {
        if xi.len() != self.dim() {
            return Err(FemError::shape(
                format!("local coordinate of {}", self.kind),
                self.dim(),
                xi.len(),
            ));
        }
        Ok(())
    }

    /// Basis values at `xi` (row vector of length `n`)
    pub fn basis(&self, xi: &[f64]) -> Result<RowDVector<f64>> {
        self.check_point(xi)?;
        Ok(self.basis.eval(xi))
    }

    /// Basis derivatives at `xi` (`dim x n`)
    pub fn basis_derivative(&self, xi: &[f64]) -> Result<DMatrix<f64>> {
        self.check_point(xi)?;
        Ok(self.basis.eval_derivative(xi))
    }

    /// Whether `xi` lies inside the reference domain
    pub fn is_inside(&self, xi: &[f64], tol: f64) -> bool {
        self.kind.topology().contains(xi, tol)
    }
}

/// Registry holding one shared [`ReferenceElement`] per kind
///
/// Built once and passed to whoever creates elements; there is no global
/// instance.
#[derive(Debug, Clone)]
pub struct ElementLibrary {
    elements: Vec<Arc<ReferenceElement>>,
}

impl ElementLibrary {
    /// Derive the basis of every catalogued kind
    pub fn new() -> Result<Self> {
        let mut elements = Vec::with_capacity(ElementKind::ALL.len());
        for kind in ElementKind::ALL {
            let reference = ReferenceElement::new(kind)?;
            log::debug!(
                "built reference element {} ({}): {} nodes, dim {}",
                kind,
                kind.description(),
                reference.num_nodes(),
                reference.dim()
            );
            elements.push(Arc::new(reference));
        }
        Ok(Self { elements })
    }

    pub fn get(&self, kind: ElementKind) -> Arc<ReferenceElement> {
        Arc::clone(&self.elements[kind.index()])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ReferenceElement>> {
        self.elements.iter()
    }

    /// Create an element instance of `kind` with validated connectivity
    pub fn create_element(
        &self,
        id: ElementId,
        kind: ElementKind,
        connectivity: Vec<NodeId>,
    ) -> Result<Element> {
        Element::new(id, self.get(kind), connectivity)
    }
}
