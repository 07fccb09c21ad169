use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::grid2d::{Domain2D, Grid2D, StepSize2D};
use crate::error::ConfigError;
use crate::numerical::stencil::Discretization;
use crate::scenario::benchmark_domain;
use crate::solver::benchmark::FailurePolicy;
use crate::solver::sparse::LuOptions;

/// Benchmark settings. Any field missing from a config file takes its
/// default, and the defaults reproduce the reference sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub domain: Domain2D,
    /// Step exponents `p`, step size `2^-p`.
    pub exponents: Vec<i32>,
    pub num_trials: usize,
    pub methods: Vec<Discretization>,
    pub on_failure: FailurePolicy,
    pub lu: LuOptions,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            domain: benchmark_domain(),
            exponents: (1..=8).collect(),
            num_trials: 30,
            methods: vec![Discretization::FiniteDifference, Discretization::FiniteElement],
            on_failure: FailurePolicy::Abort,
            lu: LuOptions::default(),
        }
    }
}

impl BenchmarkConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded benchmark config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.domain
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.num_trials == 0 {
            return Err(ConfigError::Invalid("num_trials must be at least 1".to_string()));
        }
        if self.exponents.is_empty() {
            return Err(ConfigError::Invalid("exponents must not be empty".to_string()));
        }
        if self.methods.is_empty() {
            return Err(ConfigError::Invalid("methods must not be empty".to_string()));
        }
        for &p in &self.exponents {
            Grid2D::new(self.domain, StepSize2D::from_exponent(p))
                .map_err(|e| ConfigError::Invalid(format!("step exponent {}: {}", p, e)))?;
        }
        if !(self.lu.pivot_tolerance > 0.0 && self.lu.pivot_tolerance <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "lu.pivot_tolerance must lie in (0, 1], got {}",
                self.lu.pivot_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::sparse::Ordering;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_reference_sweep() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.exponents, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(config.num_trials, 30);
        assert_eq!(config.domain, Domain2D { x_min: 3.0, x_max: 5.0, y_min: 1.0, y_max: 2.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BenchmarkConfig::from_json_str(
            r#"{ "exponents": [2, 3], "num_trials": 4, "methods": ["FiniteElement"] }"#,
        )
        .unwrap();
        assert_eq!(config.exponents, vec![2, 3]);
        assert_eq!(config.num_trials, 4);
        assert_eq!(config.methods, vec![Discretization::FiniteElement]);
        assert_eq!(config.domain, benchmark_domain());
        assert_eq!(config.on_failure, FailurePolicy::Abort);
    }

    #[test]
    fn test_lu_options_from_json() {
        let config = BenchmarkConfig::from_json_str(
            r#"{ "on_failure": "Skip", "lu": { "ordering": "Natural" } }"#,
        )
        .unwrap();
        assert_eq!(config.on_failure, FailurePolicy::Skip);
        assert_eq!(config.lu.ordering, Ordering::Natural);
        assert_eq!(config.lu.pivot_tolerance, 1.0);
    }

    #[test]
    fn test_invalid_configs() {
        for json in [
            r#"{ "num_trials": 0 }"#,
            r#"{ "exponents": [] }"#,
            r#"{ "methods": [] }"#,
            r#"{ "exponents": [1, 5000] }"#,
            r#"{ "exponents": [64] }"#,
            r#"{ "exponents": [2, 30] }"#,
            r#"{ "exponents": [-2000] }"#,
            r#"{ "domain": { "x_min": 1.0, "x_max": 0.0, "y_min": 0.0, "y_max": 1.0 } }"#,
            r#"{ "lu": { "pivot_tolerance": 2.0 } }"#,
        ] {
            assert!(
                matches!(BenchmarkConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{} should be rejected",
                json
            );
        }
        assert!(matches!(
            BenchmarkConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() -> Result<(), ConfigError> {
        let dir = tempdir()?;
        let path = dir.path().join("bench.json");
        let mut file = fs::File::create(&path)?;
        write!(file, r#"{{ "exponents": [1], "num_trials": 2 }}"#)?;
        drop(file);

        let config = BenchmarkConfig::from_json_file(&path)?;
        assert_eq!(config.exponents, vec![1]);
        assert_eq!(config.num_trials, 2);

        assert!(matches!(
            BenchmarkConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
        Ok(())
    }
}
