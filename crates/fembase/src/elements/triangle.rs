//! Triangles on the unit reference triangle (0,0), (1,0), (0,1)
//!
//! ```text
//!  eta
//!   ^
//!   2
//!   |\
//!   5  4
//!   |    \
//!   0--3--1 -> xi
//! ```
//!
//! Tri3 uses the corner nodes 0-2, Tri6 adds the mid-edge nodes
//! 3 (0-1), 4 (1-2), 5 (2-0).

use super::Definition;
use crate::basis::Monomial;

pub(super) static TRI3: Definition = Definition {
    dim: 2,
    coordinates: &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
    ],
};

pub(super) static TRI6: Definition = Definition {
    dim: 2,
    coordinates: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.5, 0.0, 0.0],
        [0.5, 0.5, 0.0],
        [0.0, 0.5, 0.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(2, 0, 0),
        Monomial::new(1, 1, 0),
        Monomial::new(0, 2, 0),
    ],
};
