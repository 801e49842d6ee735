//! Small ndarray-like types used throughout the crate.
//!
//! Provides a dense 1D `Array1` and a compressed sparse row `CsrMatrix` with
//! minimal convenience methods. These types are intentionally small and
//! dependency-light to keep the crate portable and easy to test.
pub mod sparse;
pub mod vector;

pub use sparse::{CsrMatrix, ShapeError};
pub use vector::Array1;
