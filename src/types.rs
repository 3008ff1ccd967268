// use crate::all::*;

// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Matrix2d = nalgebra::Matrix2::<f64>;
pub type Matrixd = nalgebra::DMatrix::<f64>;
