pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod numerical;
pub mod report;
pub mod scenario;
pub mod solver;
