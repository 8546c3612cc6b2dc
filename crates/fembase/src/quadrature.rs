//! Integration rules on the reference domains.
//!
//! `order` means the number of Gauss-Legendre points per direction for
//! segments, quadrilaterals and hexahedra (exact for degree `2 * order - 1`),
//! and the polynomial degree integrated exactly for triangles and tetrahedra.
//! Wedges combine a triangle rule of degree `order` with `order` points along
//! zeta. Orders beyond the tabulated rules fall back to the highest one.

use crate::elements::Topology;

/// Highest tabulated Gauss-Legendre order
const MAX_GAUSS_ORDER: usize = 5;
const MAX_TRIANGLE_DEGREE: usize = 5;
const MAX_TETRAHEDRON_DEGREE: usize = 4;

/// Quadrature point: local coordinate and weight
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationPoint {
    pub coords: Vec<f64>,
    pub weight: f64,
}

impl IntegrationPoint {
    pub fn new(coords: Vec<f64>, weight: f64) -> Self {
        Self { coords, weight }
    }
}

/// Integration points of the given order on a reference domain
pub fn integration_points(topology: Topology, order: usize) -> Vec<IntegrationPoint> {
    let order = order.max(1);
    match topology {
        Topology::Segment => gauss_legendre(order)
            .into_iter()
            .map(|(x, w)| IntegrationPoint::new(vec![x], w))
            .collect(),
        Topology::Quadrilateral => {
            let line = gauss_legendre(order);
            let mut points = Vec::with_capacity(line.len().pow(2));
            for &(xi, wi) in &line {
                for &(eta, wj) in &line {
                    points.push(IntegrationPoint::new(vec![xi, eta], wi * wj));
                }
            }
            points
        }
        Topology::Hexahedron => {
            let line = gauss_legendre(order);
            let mut points = Vec::with_capacity(line.len().pow(3));
            for &(xi, wi) in &line {
                for &(eta, wj) in &line {
                    for &(zeta, wk) in &line {
                        points.push(IntegrationPoint::new(vec![xi, eta, zeta], wi * wj * wk));
                    }
                }
            }
            points
        }
        Topology::Triangle => triangle(order),
        Topology::Tetrahedron => tetrahedron(order),
        Topology::Wedge => {
            let line = gauss_legendre(order);
            let base = triangle(order);
            let mut points = Vec::with_capacity(base.len() * line.len());
            for ip in &base {
                for &(zeta, wk) in &line {
                    points.push(IntegrationPoint::new(
                        vec![ip.coords[0], ip.coords[1], zeta],
                        ip.weight * wk,
                    ));
                }
            }
            points
        }
    }
}

/// Gauss-Legendre points and weights on [-1, 1]
fn gauss_legendre(order: usize) -> Vec<(f64, f64)> {
    match order {
        1 => vec![(0.0, 2.0)],
        2 => {
            let x = 1.0 / 3.0_f64.sqrt();
            vec![(-x, 1.0), (x, 1.0)]
        }
        3 => {
            let x = (3.0 / 5.0_f64).sqrt();
            vec![(-x, 5.0 / 9.0), (0.0, 8.0 / 9.0), (x, 5.0 / 9.0)]
        }
        4 => {
            let a = (3.0 / 7.0 - 2.0 / 7.0 * (6.0 / 5.0_f64).sqrt()).sqrt();
            let b = (3.0 / 7.0 + 2.0 / 7.0 * (6.0 / 5.0_f64).sqrt()).sqrt();
            let wa = (18.0 + 30.0_f64.sqrt()) / 36.0;
            let wb = (18.0 - 30.0_f64.sqrt()) / 36.0;
            vec![(-b, wb), (-a, wa), (a, wa), (b, wb)]
        }
        5 => {
            let a = (5.0 - 2.0 * (10.0 / 7.0_f64).sqrt()).sqrt() / 3.0;
            let b = (5.0 + 2.0 * (10.0 / 7.0_f64).sqrt()).sqrt() / 3.0;
            let wa = (322.0 + 13.0 * 70.0_f64.sqrt()) / 900.0;
            let wb = (322.0 - 13.0 * 70.0_f64.sqrt()) / 900.0;
            vec![(-b, wb), (-a, wa), (0.0, 128.0 / 225.0), (a, wa), (b, wb)]
        }
        _ => {
            log::warn!(
                "Gauss-Legendre order {} not tabulated, using {}",
                order,
                MAX_GAUSS_ORDER
            );
            gauss_legendre(MAX_GAUSS_ORDER)
        }
    }
}

/// Symmetric rules on the unit triangle (weights sum to 1/2)
fn triangle(degree: usize) -> Vec<IntegrationPoint> {
    let point = |xi: f64, eta: f64, w: f64| IntegrationPoint::new(vec![xi, eta], w);
    match degree {
        1 => vec![point(1.0 / 3.0, 1.0 / 3.0, 0.5)],
        2 => {
            let a = 1.0 / 6.0;
            let b = 2.0 / 3.0;
            let w = 1.0 / 6.0;
            vec![point(a, a, w), point(b, a, w), point(a, b, w)]
        }
        3 | 4 => {
            // Dunavant 6-point rule, degree 4
            let a1 = 0.445_948_490_915_965;
            let b1 = 1.0 - 2.0 * a1;
            let w1 = 0.223_381_589_678_011 / 2.0;
            let a2 = 0.091_576_213_509_771;
            let b2 = 1.0 - 2.0 * a2;
            let w2 = 0.109_951_743_655_322 / 2.0;
            vec![
                point(a1, a1, w1),
                point(b1, a1, w1),
                point(a1, b1, w1),
                point(a2, a2, w2),
                point(b2, a2, w2),
                point(a2, b2, w2),
            ]
        }
        5 => {
            // 7-point rule, degree 5
            let sqrt15 = 15.0_f64.sqrt();
            let a1 = 1.0 / 3.0;
            let w1 = 9.0 / 80.0;
            let a2 = (6.0 - sqrt15) / 21.0;
            let b2 = (9.0 + 2.0 * sqrt15) / 21.0;
            let w2 = (155.0 - sqrt15) / 2400.0;
            let a3 = (6.0 + sqrt15) / 21.0;
            let b3 = (9.0 - 2.0 * sqrt15) / 21.0;
            let w3 = (155.0 + sqrt15) / 2400.0;
            vec![
                point(a1, a1, w1),
                point(a2, a2, w2),
                point(b2, a2, w2),
                point(a2, b2, w2),
                point(a3, a3, w3),
                point(b3, a3, w3),
                point(a3, b3, w3),
            ]
        }
        _ => {
            log::warn!(
                "triangle rule of degree {} not tabulated, using degree {}",
                degree,
                MAX_TRIANGLE_DEGREE
            );
            triangle(MAX_TRIANGLE_DEGREE)
        }
    }
}

/// Rules on the unit tetrahedron (weights sum to 1/6)
fn tetrahedron(degree: usize) -> Vec<IntegrationPoint> {
    let point = |xi: f64, eta: f64, zeta: f64, w: f64| IntegrationPoint::new(vec![xi, eta, zeta], w);
    match degree {
        1 => vec![point(0.25, 0.25, 0.25, 1.0 / 6.0)],
        2 => {
            let a = (5.0 - 5.0_f64.sqrt()) / 20.0;
            let b = (5.0 + 3.0 * 5.0_f64.sqrt()) / 20.0;
            let w = 1.0 / 24.0;
            vec![
                point(a, a, a, w),
                point(b, a, a, w),
                point(a, b, a, w),
                point(a, a, b, w),
            ]
        }
        3 => {
            let w1 = -2.0 / 15.0;
            let w2 = 3.0 / 40.0;
            let a = 1.0 / 6.0;
            vec![
                point(0.25, 0.25, 0.25, w1),
                point(a, a, a, w2),
                point(0.5, a, a, w2),
                point(a, 0.5, a, w2),
                point(a, a, 0.5, w2),
            ]
        }
        4 => {
            // Keast 11-point rule, degree 4
            let w1 = -74.0 / 5625.0;
            let w2 = 343.0 / 45000.0;
            let w3 = 56.0 / 2250.0;
            let a = 1.0 / 14.0;
            let b = 11.0 / 14.0;
            let c = (1.0 + (5.0 / 14.0_f64).sqrt()) / 4.0;
            let d = (1.0 - (5.0 / 14.0_f64).sqrt()) / 4.0;
            vec![
                point(0.25, 0.25, 0.25, w1),
                point(a, a, a, w2),
                point(b, a, a, w2),
                point(a, b, a, w2),
                point(a, a, b, w2),
                point(c, c, d, w3),
                point(c, d, c, w3),
                point(d, c, c, w3),
                point(c, d, d, w3),
                point(d, c, d, w3),
                point(d, d, c, w3),
            ]
        }
        _ => {
            log::warn!(
                "tetrahedron rule of degree {} not tabulated, using degree {}",
                degree,
                MAX_TETRAHEDRON_DEGREE
            );
            tetrahedron(MAX_TETRAHEDRON_DEGREE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrate(points: &[IntegrationPoint], f: impl Fn(&[f64]) -> f64) -> f64 {
        points.iter().map(|ip| ip.weight * f(&ip.coords)).sum()
    }

    #[test]
    fn weights_sum_to_reference_measure() {
        let topologies = [
            Topology::Segment,
            Topology::Triangle,
            Topology::Quadrilateral,
            Topology::Tetrahedron,
            Topology::Wedge,
            Topology::Hexahedron,
        ];
        for topology in topologies {
            for order in 1..=5 {
                let points = integration_points(topology, order);
                let sum: f64 = points.iter().map(|ip| ip.weight).sum();
                assert!(
                    (sum - topology.reference_measure()).abs() < 1e-12,
                    "{:?} order {}: sum = {}",
                    topology,
                    order,
                    sum
                );
                assert!(points.iter().all(|ip| ip.coords.len() == topology.dim()));
            }
        }
    }

    #[test]
    fn gauss_legendre_exactness() {
        for order in 1..=5 {
            let points = integration_points(Topology::Segment, order);
            let degree = 2 * order - 1;
            let exact = if degree % 2 == 0 { 2.0 / (degree as f64 + 1.0) } else { 0.0 };
            let integral = integrate(&points, |x| x[0].powi(degree as i32));
            assert!((integral - exact).abs() < 1e-13, "order {order}");

            // x^(degree-1) is even
            let even = degree - 1;
            let exact = 2.0 / (even as f64 + 1.0);
            let integral = integrate(&points, |x| x[0].powi(even as i32));
            assert!((integral - exact).abs() < 1e-13, "order {order}");
        }
    }

    #[test]
    fn triangle_rules_integrate_monomials() {
        // integral of xi^2 over the unit triangle = 1/12, xi*eta = 1/24
        for degree in 2..=5 {
            let points = integration_points(Topology::Triangle, degree);
            assert!((integrate(&points, |x| x[0] * x[0]) - 1.0 / 12.0).abs() < 1e-12);
            assert!((integrate(&points, |x| x[0] * x[1]) - 1.0 / 24.0).abs() < 1e-12);
        }
    }

    #[test]
    fn tetrahedron_rules_integrate_monomials() {
        // integral of xi = 1/24, xi^2 = 1/60, xi*eta = 1/120
        for degree in 1..=4 {
            let points = integration_points(Topology::Tetrahedron, degree);
            assert!((integrate(&points, |x| x[0]) - 1.0 / 24.0).abs() < 1e-12, "degree {degree}");
        }
        for degree in 2..=4 {
            let points = integration_points(Topology::Tetrahedron, degree);
            assert!((integrate(&points, |x| x[0] * x[0]) - 1.0 / 60.0).abs() < 1e-12);
            assert!((integrate(&points, |x| x[0] * x[1]) - 1.0 / 120.0).abs() < 1e-12);
        }
    }

    #[test]
    fn order_zero_is_treated_as_one() {
        assert_eq!(integration_points(Topology::Quadrilateral, 0).len(), 1);
    }

    #[test]
    fn high_orders_fall_back() {
        assert_eq!(integration_points(Topology::Segment, 9).len(), MAX_GAUSS_ORDER);
        assert_eq!(integration_points(Topology::Tetrahedron, 9).len(), 11);
    }
}
