use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::SolveError;

/// Maximum 3D distance between two grid-adjacent samples before the step is
/// considered too steep to connect.
pub const MAXIMUM_NODE_DISTANCE: f32 = 6.0;

/// Samples closer than this to the grid's lowest sample are excluded from
/// connectivity.
pub const MINIMUM_DISTANCE_FROM_BOTTOM: f32 = 5.0;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SolverConfig {
    #[serde(default = "default_max_node_distance")]
    pub max_node_distance: f32,
    #[serde(default = "default_min_distance_from_bottom")]
    pub min_distance_from_bottom: f32,
    #[serde(default)]
    pub quad_connectivity: QuadConnectivity,
    /// Worker threads for a dedicated pool; `None` uses rayon's global pool.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_node_distance: default_max_node_distance(),
            min_distance_from_bottom: default_min_distance_from_bottom(),
            quad_connectivity: QuadConnectivity::default(),
            threads: None,
            optimizer: OptimizerConfig::default(),
        }
    }
}

fn default_max_node_distance() -> f32 {
    MAXIMUM_NODE_DISTANCE
}
fn default_min_distance_from_bottom() -> f32 {
    MINIMUM_DISTANCE_FROM_BOTTOM
}

impl SolverConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SolveError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| SolveError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SolveError> {
        let cfg: SolverConfig =
            toml::from_str(s).map_err(|e| SolveError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.max_node_distance.is_finite() && self.max_node_distance > 0.0) {
            return Err(SolveError::Config(format!(
                "max_node_distance must be positive, got {}",
                self.max_node_distance
            )));
        }
        if !(self.min_distance_from_bottom.is_finite() && self.min_distance_from_bottom >= 0.0) {
            return Err(SolveError::Config(format!(
                "min_distance_from_bottom must be non-negative, got {}",
                self.min_distance_from_bottom
            )));
        }
        if self.threads == Some(0) {
            return Err(SolveError::Config("threads must be at least 1".into()));
        }
        self.optimizer.validate()
    }
}

/// Which corner pairs of a 2x2 quad must be graph neighbors for the quad to
/// count as walkable.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuadConnectivity {
    /// All six corner pairs, diagonals included.
    #[default]
    Mutual,
    /// Only the four sides.
    Perimeter,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OptimizerConfig {
    /// Consecutive vertices closer than this collapse into one.
    #[serde(default = "default_coincident_epsilon")]
    pub coincident_epsilon: f32,
    /// A vertex this close to the chord of its neighbors is redundant.
    #[serde(default = "default_collinear_epsilon")]
    pub collinear_epsilon: f32,
    /// Upper bound on the total area removed from one polygon.
    #[serde(default = "default_max_area_drift")]
    pub max_area_drift: f32,
}

fn default_coincident_epsilon() -> f32 {
    1e-4
}
fn default_collinear_epsilon() -> f32 {
    1e-3
}
fn default_max_area_drift() -> f32 {
    1e-2
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            coincident_epsilon: default_coincident_epsilon(),
            collinear_epsilon: default_collinear_epsilon(),
            max_area_drift: default_max_area_drift(),
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), SolveError> {
        let fields = [
            ("coincident_epsilon", self.coincident_epsilon),
            ("collinear_epsilon", self.collinear_epsilon),
            ("max_area_drift", self.max_area_drift),
        ];
        for (name, v) in fields {
            if !(v.is_finite() && v >= 0.0) {
                return Err(SolveError::Config(format!(
                    "optimizer.{name} must be non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = SolverConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SolverConfig::default());
        assert_eq!(cfg.max_node_distance, 6.0);
        assert_eq!(cfg.min_distance_from_bottom, 5.0);
        assert_eq!(cfg.quad_connectivity, QuadConnectivity::Mutual);
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let cfg = SolverConfig::from_toml_str(
            r#"
            max_node_distance = 4.5
            quad_connectivity = "perimeter"
            threads = 2

            [optimizer]
            collinear_epsilon = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_node_distance, 4.5);
        assert_eq!(cfg.min_distance_from_bottom, 5.0);
        assert_eq!(cfg.quad_connectivity, QuadConnectivity::Perimeter);
        assert_eq!(cfg.threads, Some(2));
        assert_eq!(cfg.optimizer.collinear_epsilon, 0.05);
        assert_eq!(cfg.optimizer.max_area_drift, 1e-2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SolverConfig::from_toml_str("max_node_distance = -1.0"),
            Err(SolveError::Config(_))
        ));
        assert!(matches!(
            SolverConfig::from_toml_str("threads = 0"),
            Err(SolveError::Config(_))
        ));
        assert!(matches!(
            SolverConfig::from_toml_str("[optimizer]\nmax_area_drift = -0.5"),
            Err(SolveError::Config(_))
        ));
    }
}
