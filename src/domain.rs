pub mod field;
pub mod grid2d;
pub mod problem;
