//! Element evaluation: basis values, interpolation and geometry.
//!
//! The Jacobian is stored as `ref_dim x phys_dim`:
//!
//! ```text
//!     J = [dx/dξ  dy/dξ  dz/dξ]
//!         [dx/dη  dy/dη  dz/dη]
//!         [dx/dζ  dy/dζ  dz/dζ]
//! ```
//!
//! so row `k` is the tangent along local direction `k` and `J = dN * Xᵀ` with
//! `X` the nodal coordinates (`phys_dim x n`). Spatial basis derivatives are
//! `J⁻¹ * dN` when `J` is square.

use nalgebra::{DMatrix, DVector, RowDVector};

use crate::config::KernelConfig;
use crate::error::{FemError, Result};
use crate::field::FieldValue;
use crate::mesh::Element;
use crate::quadrature::{self, IntegrationPoint};

/// Which nodal positions the geometry is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Configuration {
    /// Geometry field only
    #[default]
    Reference,
    /// Geometry plus displacement
    Deformed,
}

/// Stateless evaluator over element instances
#[derive(Debug, Clone, Default)]
pub struct ElementEvaluator {
    config: KernelConfig,
}

impl ElementEvaluator {
    /// Create an evaluator after validating `config`
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Basis values at `xi` (length `n`)
    pub fn basis(&self, element: &Element, xi: &[f64]) -> Result<RowDVector<f64>> {
        element.reference().basis(xi)
    }

    /// Basis derivatives with respect to `xi` (`ref_dim x n`)
    pub fn basis_derivative(&self, element: &Element, xi: &[f64]) -> Result<DMatrix<f64>> {
        element.reference().basis_derivative(xi)
    }

    /// Value of field `name` at `xi`
    ///
    /// Spatially constant values are returned unchanged. Nodal arrays are
    /// interpolated with the basis: one row gives a scalar, several rows a
    /// vector. Nodal tensors give the basis-weighted sum of the node tensors.
    pub fn interpolate(
        &self,
        element: &Element,
        name: &str,
        xi: &[f64],
        time: f64,
    ) -> Result<FieldValue> {
        let value = element.field(name, time)?;
        let n = match value {
            FieldValue::Nodal(_) | FieldValue::NodalTensor(_) => self.basis(element, xi)?,
            constant => return Ok(constant.clone()),
        };
        Ok(match value {
            FieldValue::Nodal(values) if values.nrows() == 1 => {
                FieldValue::Scalar(values.row(0).dot(&n))
            }
            FieldValue::Nodal(values) => FieldValue::Vector(values * n.transpose()),
            FieldValue::NodalTensor(tensors) => {
                let mut sum = DMatrix::zeros(tensors[0].nrows(), tensors[0].ncols());
                for (t, &ni) in tensors.iter().zip(n.iter()) {
                    sum += t * ni;
                }
                FieldValue::Tensor(sum)
            }
            constant => constant.clone(),
        })
    }

    /// Nodal coordinates (`phys_dim x n`) in the requested configuration
    pub fn nodal_coordinates(
        &self,
        element: &Element,
        time: f64,
        configuration: Configuration,
    ) -> Result<DMatrix<f64>> {
        let geometry = self.nodal_array(element, &self.config.geometry_field, time)?;
        match configuration {
            Configuration::Reference => Ok(geometry.clone()),
            Configuration::Deformed => {
                let displacement =
                    self.nodal_array(element, &self.config.displacement_field, time)?;
                if displacement.nrows() != geometry.nrows() {
                    return Err(FemError::shape(
                        format!("displacement components of element {}", element.id()),
                        geometry.nrows(),
                        displacement.nrows(),
                    ));
                }
                Ok(geometry + displacement)
            }
        }
    }

    fn nodal_array<'a>(
        &self,
        element: &'a Element,
        name: &str,
        time: f64,
    ) -> Result<&'a DMatrix<f64>> {
        element.field(name, time)?.as_nodal().ok_or_else(|| {
            FemError::Unsupported(format!(
                "field '{}' of element {} must be a nodal array to describe positions",
                name,
                element.id()
            ))
        })
    }

    /// Jacobian `dx/dxi` at `xi` (`ref_dim x phys_dim`)
    pub fn jacobian(
        &self,
        element: &Element,
        xi: &[f64],
        time: f64,
        configuration: Configuration,
    ) -> Result<DMatrix<f64>> {
        let x = self.nodal_coordinates(element, time, configuration)?;
        let dn = self.basis_derivative(element, xi)?;
        Ok(dn * x.transpose())
    }

    /// Jacobian determinant, or the length/area scale of a manifold element
    pub fn detj(
        &self,
        element: &Element,
        xi: &[f64],
        time: f64,
        configuration: Configuration,
    ) -> Result<f64> {
        let j = self.jacobian(element, xi, time, configuration)?;
        jacobian_measure(element, &j)
    }

    /// Spatial basis derivatives `J⁻¹ * dN` (`phys_dim x n`)
    pub fn basis_gradient(
        &self,
        element: &Element,
        xi: &[f64],
        time: f64,
        configuration: Configuration,
    ) -> Result<DMatrix<f64>> {
        let x = self.nodal_coordinates(element, time, configuration)?;
        let dn = self.basis_derivative(element, xi)?;
        let j = &dn * x.transpose();
        if !j.is_square() {
            return Err(FemError::Unsupported(format!(
                "spatial derivatives need a square Jacobian, element {} has {}x{}",
                element.id(),
                j.nrows(),
                j.ncols()
            )));
        }

        let det = j.determinant();
        if det.abs() <= self.config.degeneracy_tolerance {
            return Err(FemError::degenerate(
                element.id(),
                format!("singular Jacobian (det = {det:e}) at {xi:?}"),
            ));
        }
        let j_inv = j.try_inverse().ok_or_else(|| {
            FemError::degenerate(element.id(), format!("singular Jacobian at {xi:?}"))
        })?;
        Ok(j_inv * dn)
    }

    /// Spatial gradient of field `name` at `xi` (`components x phys_dim`)
    ///
    /// `(∇u)_ij = du_i/dx_j`. Spatially constant scalars and vectors have a
    /// zero gradient. Tensor-valued fields are not supported.
    pub fn gradient(
        &self,
        element: &Element,
        name: &str,
        xi: &[f64],
        time: f64,
        configuration: Configuration,
    ) -> Result<DMatrix<f64>> {
        let value = element.field(name, time)?;
        let dndx = self.basis_gradient(element, xi, time, configuration)?;
        let phys_dim = dndx.nrows();
        match value {
            FieldValue::Scalar(_) => Ok(DMatrix::zeros(1, phys_dim)),
            FieldValue::Vector(v) => Ok(DMatrix::zeros(v.len(), phys_dim)),
            FieldValue::Nodal(values) => Ok(values * dndx.transpose()),
            FieldValue::Tensor(_) | FieldValue::NodalTensor(_) => Err(FemError::Unsupported(
                format!("gradient of tensor field '{name}'"),
            )),
        }
    }

    /// Physical position `X * N(xi)ᵀ` of local coordinate `xi`
    pub fn map_to_physical(
        &self,
        element: &Element,
        xi: &[f64],
        time: f64,
        configuration: Configuration,
    ) -> Result<DVector<f64>> {
        let x = self.nodal_coordinates(element, time, configuration)?;
        let n = self.basis(element, xi)?;
        Ok(x * n.transpose())
    }

    /// Local coordinate of physical point `point` (inverse isoparametric map)
    ///
    /// Newton iteration from the reference centroid. Only elements whose
    /// reference and physical dimensions agree can be inverted.
    ///
    /// # Errors
    /// `NoConvergence` if the residual does not drop below the configured
    /// tolerance within the iteration limit.
    pub fn local_coordinates(
        &self,
        element: &Element,
        point: &[f64],
        time: f64,
        configuration: Configuration,
    ) -> Result<Vec<f64>> {
        let x = self.nodal_coordinates(element, time, configuration)?;
        if x.nrows() != element.dim() {
            return Err(FemError::Unsupported(format!(
                "inverse mapping of {}-dimensional element {} embedded in {} dimensions",
                element.dim(),
                element.id(),
                x.nrows()
            )));
        }
        if point.len() != x.nrows() {
            return Err(FemError::shape("physical point", x.nrows(), point.len()));
        }

        let reference = element.reference();
        let target = DVector::from_column_slice(point);
        let residual_at = |xi: &[f64]| -> Result<DVector<f64>> {
            Ok(&x * reference.basis(xi)?.transpose() - &target)
        };

        let mut xi = element.kind().topology().centroid();
        for _ in 0..self.config.newton_max_iterations {
            let r = residual_at(&xi)?;
            if r.norm() < self.config.newton_tolerance {
                return Ok(xi);
            }
            let jt = (reference.basis_derivative(&xi)? * x.transpose()).transpose();
            let step = jt.lu().solve(&(-r)).ok_or_else(|| {
                FemError::degenerate(element.id(), format!("singular Jacobian at {xi:?}"))
            })?;
            for (x_k, s_k) in xi.iter_mut().zip(step.iter()) {
                *x_k += s_k;
            }
        }

        let residual = residual_at(&xi)?.norm();
        if residual < self.config.newton_tolerance {
            return Ok(xi);
        }
        Err(FemError::NoConvergence {
            element: element.id(),
            iterations: self.config.newton_max_iterations,
            residual,
        })
    }

    /// Integration points of `order`, or of the element's default order
    pub fn integration_points(
        &self,
        element: &Element,
        order: Option<usize>,
    ) -> Vec<IntegrationPoint> {
        let kind = element.kind();
        let order = order.unwrap_or_else(|| kind.default_integration_order());
        quadrature::integration_points(kind.topology(), order)
    }

    /// Length, area or volume of the element
    pub fn measure(
        &self,
        element: &Element,
        time: f64,
        configuration: Configuration,
    ) -> Result<f64> {
        let x = self.nodal_coordinates(element, time, configuration)?;
        let reference = element.reference();
        let mut total = 0.0;
        for ip in self.integration_points(element, None) {
            let j = reference.basis_derivative(&ip.coords)? * x.transpose();
            total += ip.weight * jacobian_measure(element, &j)?;
        }
        Ok(total)
    }
}

/// `det J` for square Jacobians, the tangent length for curves and the
/// tangent cross product norm for surfaces in 3D
pub(crate) fn jacobian_measure(element: &Element, j: &DMatrix<f64>) -> Result<f64> {
    match j.shape() {
        (r, c) if r == c => Ok(j.determinant()),
        (1, _) => Ok(j.row(0).norm()),
        (2, 3) => {
            let t1 = j.row(0).transpose();
            let t2 = j.row(1).transpose();
            Ok(t1.cross(&t2).norm())
        }
        (r, c) => Err(FemError::degenerate(
            element.id(),
            format!("no measure for a {r}x{c} Jacobian"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, ElementLibrary};
    use crate::field::Field;

    fn element(kind: ElementKind, coords: &[&[f64]]) -> Element {
        let library = ElementLibrary::new().unwrap();
        let mut elem = library
            .create_element(1, kind, (0..coords.len()).collect())
            .unwrap();
        let columns: Vec<DVector<f64>> = coords
            .iter()
            .map(|c| DVector::from_column_slice(c))
            .collect();
        elem.set_field("geometry", FieldValue::nodal_vectors(&columns).unwrap())
            .unwrap();
        elem
    }

    #[test]
    fn jacobian_layout_is_ref_by_phys() {
        let elem = element(ElementKind::Seg2, &[&[0.0, 0.0, 0.0], &[2.0, 2.0, 1.0]]);
        let eval = ElementEvaluator::default();
        let j = eval.jacobian(&elem, &[0.0], 0.0, Configuration::Reference).unwrap();
        assert_eq!(j.shape(), (1, 3));
        assert!((j[(0, 0)] - 1.0).abs() < 1e-14);
        assert!((j[(0, 1)] - 1.0).abs() < 1e-14);
        assert!((j[(0, 2)] - 0.5).abs() < 1e-14);

        let detj = eval.detj(&elem, &[0.3], 0.0, Configuration::Reference).unwrap();
        assert!((detj - 1.5).abs() < 1e-14);
    }

    #[test]
    fn surface_measure_in_3d() {
        let elem = element(
            ElementKind::Tri3,
            &[&[0.0, 0.0, 1.0], &[2.0, 0.0, 1.0], &[0.0, 3.0, 1.0]],
        );
        let eval = ElementEvaluator::default();
        let detj = eval
            .detj(&elem, &[0.2, 0.2], 0.0, Configuration::Reference)
            .unwrap();
        assert!((detj - 6.0).abs() < 1e-12);
        let area = eval.measure(&elem, 0.0, Configuration::Reference).unwrap();
        assert!((area - 3.0).abs() < 1e-12);
    }

    #[test]
    fn surface_in_1d_is_degenerate() {
        let elem = element(ElementKind::Tri3, &[&[0.0], &[1.0], &[2.0]]);
        let eval = ElementEvaluator::default();
        let err = eval
            .detj(&elem, &[0.2, 0.2], 0.0, Configuration::Reference)
            .unwrap_err();
        assert!(matches!(err, FemError::DegenerateGeometry { element: 1, .. }));
    }

    #[test]
    fn nodal_tensor_interpolation() {
        let mut elem = element(ElementKind::Seg2, &[&[0.0], &[1.0]]);
        let tensors = vec![DMatrix::identity(2, 2), DMatrix::identity(2, 2) * 3.0];
        elem.set_field("stress", FieldValue::NodalTensor(tensors)).unwrap();

        let eval = ElementEvaluator::default();
        let value = eval.interpolate(&elem, "stress", &[0.0], 0.0).unwrap();
        let t = value.as_tensor().unwrap();
        assert!((t[(0, 0)] - 2.0).abs() < 1e-14);
        assert!(t[(0, 1)].abs() < 1e-14);
    }

    #[test]
    fn constant_fields_pass_through() {
        let mut elem = element(ElementKind::Seg2, &[&[0.0], &[1.0]]);
        elem.set_field("density", Field::constant(7.8e-9)).unwrap();
        let eval = ElementEvaluator::default();
        let value = eval.interpolate(&elem, "density", &[0.5], 10.0).unwrap();
        assert_eq!(value, FieldValue::Scalar(7.8e-9));

        let grad = eval
            .gradient(&elem, "density", &[0.5], 0.0, Configuration::Reference)
            .unwrap();
        assert_eq!(grad.shape(), (1, 1));
        assert_eq!(grad[(0, 0)], 0.0);
    }

    #[test]
    fn geometry_must_be_nodal() {
        let library = ElementLibrary::new().unwrap();
        let mut elem = library
            .create_element(5, ElementKind::Seg2, vec![1, 2])
            .unwrap();
        elem.set_field("geometry", Field::constant(1.0)).unwrap();
        let eval = ElementEvaluator::default();
        let err = eval
            .jacobian(&elem, &[0.0], 0.0, Configuration::Reference)
            .unwrap_err();
        assert!(matches!(err, FemError::Unsupported(_)));
    }

    #[test]
    fn newton_gives_up_after_iteration_limit() {
        let elem = element(
            ElementKind::Quad4,
            &[&[0.0, 0.0], &[2.0, 0.0], &[1.5, 1.0], &[0.5, 1.0]],
        );
        let config = KernelConfig {
            newton_max_iterations: 1,
            ..KernelConfig::default()
        };
        let eval = ElementEvaluator::new(config).unwrap();
        let target = eval
            .map_to_physical(&elem, &[0.5, 0.5], 0.0, Configuration::Reference)
            .unwrap();
        let err = eval
            .local_coordinates(&elem, target.as_slice(), 0.0, Configuration::Reference)
            .unwrap_err();
        assert!(matches!(err, FemError::NoConvergence { iterations: 1, .. }));

        let xi = ElementEvaluator::default()
            .local_coordinates(&elem, target.as_slice(), 0.0, Configuration::Reference)
            .unwrap();
        assert!((xi[0] - 0.5).abs() < 1e-9);
        assert!((xi[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ElementEvaluator>();
        assert_send_sync::<Element>();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = KernelConfig {
            dual_basis_order: 0,
            ..KernelConfig::default()
        };
        assert!(matches!(
            ElementEvaluator::new(config),
            Err(FemError::Config(_))
        ));
    }
}
