//! Geodesic calculations on an ellipsoid of revolution: inverse and direct
//! problems, geodesic lines, and polygon perimeters and areas, with an
//! array-oriented front end and optional Python bindings.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod accumulator;
pub mod ellipsoid;
pub mod error;
pub mod geod;
pub mod geodesic;
pub mod math;
pub mod polygon;
#[cfg(feature = "python")]
mod py;

pub use accumulator::Accumulator;
pub use ellipsoid::Ellipsoid;
pub use error::GeodError;
pub use geod::Geod;
pub use geodesic::{Geodesic, GeodesicData, GeodesicLine, Mask};
pub use polygon::{PolygonArea, PolygonResult};

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
