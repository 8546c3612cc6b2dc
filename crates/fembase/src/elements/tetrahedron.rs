//! Tetrahedra on the unit reference simplex
//!
//! Node numbering:
//! ```text
//!            3
//!           /|\
//!          7 | 9
//!         /  8  \
//!        0---|-6-2
//!         \  |  /
//!          4 | 5
//!           \|/
//!            1
//!
//! Nodes 0-3: corners (0,0,0), (1,0,0), (0,1,0), (0,0,1)
//! Nodes 4-9: mid-edge (4: 0-1, 5: 1-2, 6: 2-0, 7: 0-3, 8: 1-3, 9: 2-3)
//! ```

use super::Definition;
use crate::basis::Monomial;

pub(super) static TET4: Definition = Definition {
    dim: 3,
    coordinates: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(0, 0, 1),
    ],
};

pub(super) static TET10: Definition = Definition {
    dim: 3,
    coordinates: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.5, 0.0, 0.0],
        [0.5, 0.5, 0.0],
        [0.0, 0.5, 0.0],
        [0.0, 0.0, 0.5],
        [0.5, 0.0, 0.5],
        [0.0, 0.5, 0.5],
    ],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(0, 1, 0),
        Monomial::new(0, 0, 1),
        Monomial::new(2, 0, 0),
        Monomial::new(0, 2, 0),
        Monomial::new(0, 0, 2),
        Monomial::new(1, 1, 0),
        Monomial::new(0, 1, 1),
        Monomial::new(1, 0, 1),
    ],
};
