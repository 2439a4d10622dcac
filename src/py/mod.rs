use pyo3::prelude::*;

mod geod;

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(geod::geod_fwd, m)?)?;
    m.add_function(wrap_pyfunction!(geod::geod_inv, m)?)?;
    m.add_function(wrap_pyfunction!(geod::geod_npts, m)?)?;
    m.add_function(wrap_pyfunction!(geod::geod_line_lengths, m)?)?;
    m.add_function(wrap_pyfunction!(geod::geod_line_length, m)?)?;
    m.add_function(wrap_pyfunction!(geod::geod_polygon_area_perimeter, m)?)?;
    Ok(())
}
