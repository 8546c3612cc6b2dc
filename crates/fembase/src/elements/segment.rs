//! Line elements on the reference interval [-1, 1]
//!
//! ```text
//! Seg2:  0-----------1        Seg3:  0-----2-----1
//!       -1           1              -1     0     1
//! ```

use super::Definition;
use crate::basis::Monomial;

pub(super) static SEG2: Definition = Definition {
    dim: 1,
    coordinates: &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
    monomials: &[Monomial::new(0, 0, 0), Monomial::new(1, 0, 0)],
};

pub(super) static SEG3: Definition = Definition {
    dim: 1,
    coordinates: &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
    monomials: &[
        Monomial::new(0, 0, 0),
        Monomial::new(1, 0, 0),
        Monomial::new(2, 0, 0),
    ],
};
