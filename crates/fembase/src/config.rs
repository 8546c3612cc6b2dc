//! Evaluation settings shared by the evaluator and the frame builder.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FemError, Result};

/// Kernel configuration
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Nodal field holding reference coordinates
    pub geometry_field: String,
    /// Nodal field added to the geometry in the deformed configuration
    pub displacement_field: String,
    /// Quadrature order used to build dual bases
    pub dual_basis_order: usize,
    /// Quadrature order for normal accumulation (element default when `None`)
    pub frame_integration_order: Option<usize>,
    /// Threshold below which determinants and normal lengths count as zero
    pub degeneracy_tolerance: f64,
    /// Residual norm accepted by the inverse isoparametric mapping
    pub newton_tolerance: f64,
    /// Iteration limit of the inverse isoparametric mapping
    pub newton_max_iterations: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            geometry_field: "geometry".to_string(),
            displacement_field: "displacement".to_string(),
            dual_basis_order: 3,
            frame_integration_order: None,
            degeneracy_tolerance: 1e-12,
            newton_tolerance: 1e-10,
            newton_max_iterations: 25,
        }
    }
}

impl KernelConfig {
    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that orders are positive and tolerances are finite and positive
    pub fn validate(&self) -> Result<()> {
        if self.geometry_field.is_empty() || self.displacement_field.is_empty() {
            return Err(FemError::Config("field names must not be empty".to_string()));
        }
        if self.geometry_field == self.displacement_field {
            return Err(FemError::Config(format!(
                "geometry and displacement share the field name '{}'",
                self.geometry_field
            )));
        }
        if self.dual_basis_order == 0 {
            return Err(FemError::Config("dual_basis_order must be at least 1".to_string()));
        }
        if self.frame_integration_order == Some(0) {
            return Err(FemError::Config(
                "frame_integration_order must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("degeneracy_tolerance", self.degeneracy_tolerance),
            ("newton_tolerance", self.newton_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FemError::Config(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if self.newton_max_iterations == 0 {
            return Err(FemError::Config(
                "newton_max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dual_basis_order, 3);
        assert_eq!(config.geometry_field, "geometry");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = KernelConfig::from_json_str(r#"{ "dual_basis_order": 2 }"#).unwrap();
        assert_eq!(config.dual_basis_order, 2);
        assert_eq!(config.displacement_field, "displacement");
        assert_eq!(config.frame_integration_order, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = KernelConfig::from_json_str(r#"{ "degeneracy_tolerance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, FemError::Config(_)));

        let err = KernelConfig::from_json_str(r#"{ "dual_basis_order": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("dual_basis_order"));

        let err = KernelConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FemError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "geometry_field": "coords", "frame_integration_order": 4 }}"#
        )
        .unwrap();

        let config = KernelConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.geometry_field, "coords");
        assert_eq!(config.frame_integration_order, Some(4));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = KernelConfig::from_json_file("/nonexistent/fembase.json").unwrap_err();
        assert!(matches!(err, FemError::Io(_)));
    }
}
