//! Quadrilaterals on the reference square [-1, 1]²
//!
//! ```text
//!   eta
//!    ^
//!    3-----6-----2
//!    |           |
//!    7     8     5   -> xi
//!    |           |
//!    0-----4-----1
//! ```
//!
//! - Quad4: corners 0-3 (bilinear)
//! - Quad8: corners + mid-side nodes 4-7 (serendipity)
//! - Quad9: Quad8 + centre node 8 (biquadratic)

use super::Definition;
use crate::basis::Monomial;

pub(super) static QUAD4: Definition = Definition {
    dim: 2,
    coordinates: &[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(1, 1, 0),
    ],
};

pub(super) static QUAD8: Definition = Definition {
    dim: 2,
    coordinates: &[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(2, 0, 0),
        Monomial::new(1, 1, 0),
        Monomial::new(0, 2, 0),
        Monomial::new(2, 1, 0),
        Monomial::new(1, 2, 0),
    ],
};

pub(super) static QUAD9: Definition = Definition {
    dim: 2,
    coordinates: &[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(2, 0, 0),
        Monomial::new(1, 1, 0),
        Monomial::new(0, 2, 0),
        Monomial::new(2, 1, 0),
        Monomial::new(1, 2, 0),
        Monomial::new(2, 2, 0),
    ],
};
