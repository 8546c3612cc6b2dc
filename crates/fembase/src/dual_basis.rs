//! Dual (biorthogonal) bases for mortar-type coupling.
//!
//! With `D = Σ w diag(N) detJ` and `M = Σ w NᵀN detJ` over the element, the
//! dual basis `ψ = A N` with `A = D M⁻¹` satisfies `∫ ψ_i N_j = δ_ij D_jj`.

use nalgebra::{DMatrix, DVector, RowDVector};

use crate::elements::Topology;
use crate::error::{FemError, Result};
use crate::evaluator::{jacobian_measure, Configuration, ElementEvaluator};
use crate::mesh::Element;

/// Coefficients of a dual basis and the matrices it was built from
#[derive(Debug, Clone)]
pub struct DualBasis {
    d: DMatrix<f64>,
    m: DMatrix<f64>,
    a: DMatrix<f64>,
}

impl DualBasis {
    /// Diagonal matrix `D`
    pub fn d(&self) -> &DMatrix<f64> {
        &self.d
    }

    /// Mass matrix `M`
    pub fn m(&self) -> &DMatrix<f64> {
        &self.m
    }

    /// Coefficient matrix `A = D M⁻¹`
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Dual basis values `A Nᵀ` for basis values `n`
    pub fn evaluate(&self, n: &RowDVector<f64>) -> DVector<f64> {
        &self.a * n.transpose()
    }
}

impl ElementEvaluator {
    /// Dual basis of `element` in the reference configuration at `time`
    ///
    /// # Errors
    /// `DegenerateGeometry` if the element mass matrix is singular.
    pub fn dual_basis(&self, element: &Element, time: f64) -> Result<DualBasis> {
        let x = self.nodal_coordinates(element, time, Configuration::Reference)?;
        let reference = element.reference();
        let n_nodes = element.num_nodes();

        let order = mass_exact_order(element, self.config().dual_basis_order);
        let mut d = DMatrix::zeros(n_nodes, n_nodes);
        let mut m = DMatrix::zeros(n_nodes, n_nodes);
        for ip in self.integration_points(element, Some(order)) {
            let n = reference.basis(&ip.coords)?;
            let j = reference.basis_derivative(&ip.coords)? * x.transpose();
            let scale = ip.weight * jacobian_measure(element, &j)?;
            for i in 0..n_nodes {
                d[(i, i)] += scale * n[i];
            }
            m += n.transpose() * &n * scale;
        }

        let singular_values = m.singular_values();
        let (smallest, largest) = (singular_values.min(), singular_values.max());
        if smallest.is_nan() || smallest <= self.config().degeneracy_tolerance * largest {
            return Err(FemError::degenerate(
                element.id(),
                format!("singular mass matrix (singular values {smallest:e} .. {largest:e})"),
            ));
        }
        let m_inv = m.clone().try_inverse().ok_or_else(|| {
            FemError::degenerate(element.id(), "singular mass matrix".to_string())
        })?;
        let a = &d * m_inv;
        Ok(DualBasis { d, m, a })
    }
}

/// Smallest rule order, at least `requested`, that integrates `NᵀN` exactly
///
/// Simplex rules are indexed by degree, so they need twice the basis degree.
/// Gauss rules are indexed by points per direction and need one more point
/// than the largest exponent along any axis.
fn mass_exact_order(element: &Element, requested: usize) -> usize {
    let monomials = element.reference().lagrange_basis().monomials();
    let degree = monomials.iter().map(|m| m.degree() as usize).max().unwrap_or(0);
    let exponent = monomials
        .iter()
        .flat_map(|m| m.exponents())
        .map(usize::from)
        .max()
        .unwrap_or(0);
    let needed = match element.kind().topology() {
        Topology::Segment | Topology::Quadrilateral | Topology::Hexahedron => exponent + 1,
        Topology::Triangle | Topology::Tetrahedron | Topology::Wedge => 2 * degree,
    };
    requested.max(needed)
}
