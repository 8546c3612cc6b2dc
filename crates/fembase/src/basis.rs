//! Lagrange basis construction from a node layout and a monomial basis.
//!
//! For reference nodes `X = [x_1 .. x_n]` and monomials `P = [p_1 .. p_n]` the
//! matrix `A[i, j] = p_j(x_i)` is inverted once, giving the coefficient matrix
//! `C = (A^T)^-1`. The basis is then `N(xi) = C * P(xi)`, which satisfies
//! `N_i(x_j) = delta_ij`. Derivatives are exact: each monomial is differentiated
//! analytically and pushed through the same constant `C`.

use nalgebra::{DMatrix, DVector, RowDVector};

use crate::error::{FemError, Result};

/// Largest deviation from the Kronecker property accepted after inversion
const KRONECKER_TOLERANCE: f64 = 1e-8;

/// Monomial `xi^a * eta^b * zeta^c`, stored as its exponents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Monomial {
    exponents: [u8; 3],
}

impl Monomial {
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self {
            exponents: [a, b, c],
        }
    }

    pub fn exponents(&self) -> [u8; 3] {
        self.exponents
    }

    /// Total polynomial degree
    pub fn degree(&self) -> u32 {
        self.exponents.iter().map(|&e| e as u32).sum()
    }

    /// Value at `xi`; exponents past `xi.len()` must be zero
    pub fn eval(&self, xi: &[f64]) -> f64 {
        xi.iter()
            .zip(self.exponents.iter())
            .map(|(&x, &e)| x.powi(e as i32))
            .product()
    }

    /// Partial derivative with respect to `xi[k]`
    pub fn derivative(&self, xi: &[f64], k: usize) -> f64 {
        let e = self.exponents[k];
        if e == 0 {
            return 0.0;
        }

        let mut value = e as f64;
        for (j, (&x, &ej)) in xi.iter().zip(self.exponents.iter()).enumerate() {
            let power = if j == k { ej - 1 } else { ej };
            value *= x.powi(power as i32);
        }
        value
    }
}

/// Interpolation basis derived from a reference node layout
#[derive(Debug, Clone)]
pub struct LagrangeBasis {
    dim: usize,
    monomials: Vec<Monomial>,
    coefficients: DMatrix<f64>,
}

impl LagrangeBasis {
    /// Build the basis for nodes given as columns of `coordinates` (`dim x n`)
    ///
    /// # Arguments
    /// * `name` - Element name used in error messages
    /// * `coordinates` - Reference node coordinates, one column per node
    /// * `monomials` - Polynomial space, one monomial per node
    ///
    /// # Errors
    /// Returns `DegenerateReferenceElement` if the sizes disagree or the node
    /// layout is not unisolvent for the monomials.
    pub fn new(name: &str, coordinates: &DMatrix<f64>, monomials: &[Monomial]) -> Result<Self> {
        let dim = coordinates.nrows();
        let n = coordinates.ncols();
        let degenerate = |reason: String| FemError::DegenerateReferenceElement {
            element: name.to_string(),
            reason,
        };

        if monomials.len() != n {
            return Err(degenerate(format!(
                "{} monomials for {} nodes",
                monomials.len(),
                n
            )));
        }
        if dim == 0 || dim > 3 {
            return Err(degenerate(format!("unsupported reference dimension {dim}")));
        }
        if let Some(m) = monomials
            .iter()
            .find(|m| m.exponents()[dim..].iter().any(|&e| e != 0))
        {
            return Err(degenerate(format!(
                "monomial {:?} uses a coordinate beyond dimension {}",
                m.exponents(),
                dim
            )));
        }

        let a = DMatrix::from_fn(n, n, |i, j| {
            let node: Vec<f64> = coordinates.column(i).iter().copied().collect();
            monomials[j].eval(&node)
        });
        let coefficients = a
            .transpose()
            .try_inverse()
            .ok_or_else(|| degenerate("node layout gives a singular monomial matrix".to_string()))?;

        let basis = Self {
            dim,
            monomials: monomials.to_vec(),
            coefficients,
        };

        // try_inverse only catches exact singularity
        let mut worst = 0.0_f64;
        for j in 0..n {
            let node: Vec<f64> = coordinates.column(j).iter().copied().collect();
            let values = basis.eval(&node);
            for i in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((values[i] - expected).abs());
            }
        }
        if !worst.is_finite() || worst > KRONECKER_TOLERANCE {
            return Err(degenerate(format!(
                "basis violates the Kronecker property by {worst:e}"
            )));
        }

        Ok(basis)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    pub fn monomials(&self) -> &[Monomial] {
        &self.monomials
    }

    /// Coefficient matrix `(A^T)^-1`
    pub fn coefficients(&self) -> &DMatrix<f64> {
        &self.coefficients
    }

    /// Monomial vector `P(xi)`
    fn monomial_values(&self, xi: &[f64]) -> DVector<f64> {
        DVector::from_iterator(self.len(), self.monomials.iter().map(|m| m.eval(xi)))
    }

    /// Basis values `N(xi)` as a row vector (caller checks `xi.len() == dim`)
    pub fn eval(&self, xi: &[f64]) -> RowDVector<f64> {
        (&self.coefficients * self.monomial_values(xi)).transpose()
    }

    /// Basis derivatives `dN/dxi` (`dim x n`, row `k` = derivative along `xi_k`)
    pub fn eval_derivative(&self, xi: &[f64]) -> DMatrix<f64> {
        let dp = DMatrix::from_fn(self.dim, self.len(), |k, j| {
            self.monomials[j].derivative(xi, k)
        });
        dp * self.coefficients.transpose()
    }
}
