use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid step size: {0}")]
    InvalidStepSize(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Singular system: {0}")]
    SingularSystem(String),

    #[error("Non-finite value in system: {0}")]
    NonFinite(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
