//! Hexahedra and wedges
//!
//! Hex8 node ordering (reference cube [-1, 1]³):
//! ```text
//!        7----------6
//!       /|         /|
//!      / |        / |
//!     4----------5  |
//!     |  3-------|--2
//!     | /        | /
//!     |/         |/
//!     0----------1
//! ```
//!
//! - Bottom face: nodes 0-3 (zeta = -1), top face: nodes 4-7 (zeta = +1)
//!
//! Wedge6 is the unit triangle extruded over zeta in [-1, 1]: nodes 0-2 on
//! the bottom face, 3-5 above them.

use super::Definition;
use crate::basis::Monomial;

pub(super) static HEX8: Definition = Definition {
    dim: 3,
    coordinates: &[
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(0, 0, 1),
        Monomial::new(1, 1, 0),
        Monomial::new(0, 1, 1),
        Monomial::new(1, 0, 1),
        Monomial::new(1, 1, 1),
    ],
};

pub(super) static WEDGE6: Definition = Definition {
    dim: 3,
    coordinates: &[
        [0.0, 0.0, -1.0],
        [1.0, 0.0, -1.0],
        [0.0, 1.0, -1.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(0, 0, 1),
        Monomial::new(1, 0, 1),
        Monomial::new(0, 1, 1),
    ],
};
