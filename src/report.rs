use std::io::{self, Write};

use serde::Serialize;

use crate::config::BenchmarkConfig;
use crate::domain::grid2d::Domain2D;
use crate::numerical::stencil::Discretization;
use crate::solver::benchmark::{records, ErrorRecord, StepResult};

#[derive(Serialize, Debug)]
struct Metadata {
    domain: Domain2D,
    num_trials: usize,
    exponents: Vec<i32>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub method: Discretization,
    pub records: Vec<ErrorRecord>,
}

/// Error records of every benchmarked method, ready for serialization.
#[derive(Serialize, Debug)]
pub struct BenchmarkReport {
    metadata: Metadata,
    pub methods: Vec<MethodReport>,
}

impl BenchmarkReport {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            metadata: Metadata {
                domain: config.domain,
                num_trials: config.num_trials,
                exponents: config.exponents.clone(),
            },
            methods: Vec::with_capacity(config.methods.len()),
        }
    }

    pub fn push(&mut self, method: Discretization, results: &[StepResult]) {
        self.methods.push(MethodReport {
            method,
            records: records(results),
        });
    }

    pub fn records_for(&self, method: Discretization) -> Option<&[ErrorRecord]> {
        self.methods
            .iter()
            .find(|r| r.method == method)
            .map(|r| r.records.as_slice())
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(p: i32) -> ErrorRecord {
        ErrorRecord {
            p,
            t_avg: 0.5,
            h: 2f64.powi(-p),
            k: 2f64.powi(-p),
            num_trials: 3,
            error_avg: -0.25,
            error_abs_mean: 0.25,
        }
    }

    #[test]
    fn test_write_json() -> io::Result<()> {
        let config = BenchmarkConfig {
            exponents: vec![1, 2],
            num_trials: 3,
            ..BenchmarkConfig::default()
        };
        let mut report = BenchmarkReport::new(&config);
        report.methods.push(MethodReport {
            method: Discretization::FiniteElement,
            records: vec![record(1), record(2)],
        });

        let mut buffer = Vec::new();
        report.write_json(&mut buffer)?;
        let output: serde_json::Value = serde_json::from_slice(&buffer)?;

        assert_eq!(output["metadata"]["num_trials"], 3);
        assert_eq!(output["metadata"]["domain"]["x_max"], 5.0);
        assert_eq!(output["methods"][0]["method"], "FiniteElement");
        let rows = output["methods"][0]["records"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["p"], 2);
        assert_eq!(rows[1]["h"], 0.25);
        assert_eq!(rows[0]["error_abs_mean"], 0.25);

        assert!(report.records_for(Discretization::FiniteElement).is_some());
        assert!(report.records_for(Discretization::FiniteDifference).is_none());
        Ok(())
    }
}
